//! Charging and fuelling infrastructure costs.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::finance::annual_capital_cost;
use crate::scenario::ScenarioInput;
use crate::units::{Dimensionless, Money};

/// The name of the up-front charger payment implementation
pub const UPFRONT_IMPLEMENTATION: &str = "upfront";

/// This vehicle's share of the charger capital cost
fn charger_share(scenario: &ScenarioInput) -> Money {
    let params = &scenario.costs.infrastructure;
    params.charger_capital_cost / Dimensionless(params.vehicles_per_charger as f64)
}

/// Annual maintenance of this vehicle's share of the charger
fn charger_maintenance(scenario: &ScenarioInput, year: u32) -> Money {
    charger_share(scenario)
        * scenario.costs.infrastructure.maintenance_fraction
        * scenario.inflation_factor(year)
}

/// Depot charger cost spread evenly over its economic life
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortisedChargerCost;

impl CostStrategy for AmortisedChargerCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let annualised = annual_capital_cost(
            charger_share(scenario),
            scenario.costs.infrastructure.charger_lifetime_years,
            scenario.economic.discount_rate,
        );
        Ok(annualised + charger_maintenance(scenario, year))
    }
}

/// Depot charger paid for in full in the first year
#[derive(Debug, Clone, Copy, Default)]
pub struct UpfrontChargerCost;

impl CostStrategy for UpfrontChargerCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let capital = if year == 0 {
            charger_share(scenario)
        } else {
            Money(0.0)
        };
        Ok(capital + charger_maintenance(scenario, year))
    }
}

/// Depot fuelling facilities for diesel vehicles
#[derive(Debug, Clone, Copy, Default)]
pub struct DepotFuellingCost;

impl CostStrategy for DepotFuellingCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(scenario.costs.infrastructure.depot_annual_cost * scenario.inflation_factor(year))
    }
}
