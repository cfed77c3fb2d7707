//! Carbon tax, road user charges and other levies.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::{ScenarioInput, escalation_factor};
use crate::units::{Money, MoneyPerEmissions};

/// The carbon price in the given year, after escalation
pub fn carbon_price(scenario: &ScenarioInput, year: u32) -> MoneyPerEmissions {
    let economic = &scenario.economic;
    economic.carbon_price * escalation_factor(economic.carbon_price_escalation, year)
}

/// Tax on tailpipe CO2 emissions
#[derive(Debug, Clone, Copy, Default)]
pub struct EmissionsCarbonTax;

impl CostStrategy for EmissionsCarbonTax {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(scenario.emissions(year) * carbon_price(scenario, year))
    }
}

/// Distance-based road user charges plus flat annual levies
#[derive(Debug, Clone, Copy, Default)]
pub struct RoadUserCharges;

impl CostStrategy for RoadUserCharges {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let params = &scenario.costs.taxes;
        let charges = params.road_user_charge_per_km * scenario.annual_distance(year);
        Ok((charges + params.annual_levy) * scenario.inflation_factor(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{diesel_scenario, electric_scenario};
    use crate::units::Dimensionless;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn test_diesel_carbon_tax(diesel_scenario: ScenarioInput) {
        // 26,400 L * 0.00268 t/L * 50/t
        let cost = EmissionsCarbonTax
            .calculate_costs(&diesel_scenario, 0)
            .unwrap();
        assert_approx_eq!(Money, cost, Money(3_537.6), epsilon = 1e-6);
    }

    #[rstest]
    fn test_carbon_price_escalation(mut diesel_scenario: ScenarioInput) {
        diesel_scenario.economic.carbon_price_escalation = Dimensionless(0.1);
        let cost = EmissionsCarbonTax
            .calculate_costs(&diesel_scenario, 1)
            .unwrap();
        assert_approx_eq!(Money, cost, Money(3_537.6 * 1.1), epsilon = 1e-6);
    }

    #[rstest]
    fn test_electric_carbon_tax_is_zero(electric_scenario: ScenarioInput) {
        let cost = EmissionsCarbonTax
            .calculate_costs(&electric_scenario, 0)
            .unwrap();
        assert_eq!(cost, Money(0.0));
    }

    #[rstest]
    fn test_road_user_charges(diesel_scenario: ScenarioInput) {
        // 0.05/km * 80,000 km + 500 levy
        let cost = RoadUserCharges
            .calculate_costs(&diesel_scenario, 0)
            .unwrap();
        assert_approx_eq!(Money, cost, Money(4_500.0), epsilon = 1e-6);
    }
}
