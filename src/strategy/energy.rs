//! Fuel and electricity costs.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::{ScenarioInput, escalation_factor};
use crate::units::{Dimensionless, Money, MoneyPerEnergy};

/// Months over which demand charges are levied each year
const MONTHS_PER_YEAR: f64 = 12.0;

/// The energy price in the given year, after escalation
pub fn energy_price(scenario: &ScenarioInput, year: u32) -> MoneyPerEnergy {
    let economic = &scenario.economic;
    economic.energy_price * escalation_factor(economic.energy_price_escalation, year)
}

/// Cost of the energy consumed in the given year
fn consumption_cost(scenario: &ScenarioInput, year: u32) -> Money {
    scenario.energy_consumption(year) * energy_price(scenario, year)
}

/// Diesel fuel consumed at the pump price
#[derive(Debug, Clone, Copy, Default)]
pub struct DieselFuelCost;

impl CostStrategy for DieselFuelCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(consumption_cost(scenario, year))
    }
}

/// Electricity consumed plus depot demand charges
#[derive(Debug, Clone, Copy, Default)]
pub struct ElectricityCost;

impl ElectricityCost {
    /// Annual demand charges for the vehicle's share of peak charging demand
    fn demand_charges(scenario: &ScenarioInput, year: u32) -> Money {
        let energy = &scenario.vehicle.energy;
        energy.demand_charge_per_kw_month
            * energy.peak_demand_kw
            * Dimensionless(MONTHS_PER_YEAR)
            * scenario.inflation_factor(year)
    }
}

impl CostStrategy for ElectricityCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(consumption_cost(scenario, year) + Self::demand_charges(scenario, year))
    }
}
