//! Insurance premiums and registration fees.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::ScenarioInput;
use crate::units::Money;

/// Premium charged as a proportion of the vehicle's current market value
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBasedInsurance;

impl CostStrategy for ValueBasedInsurance {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let rate = scenario.costs.insurance.rate;
        Ok(scenario.vehicle_value(year) * rate * scenario.inflation_factor(year))
    }
}

/// A flat annual registration fee
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnualRegistrationFee;

impl CostStrategy for AnnualRegistrationFee {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(scenario.costs.registration.annual_fee * scenario.inflation_factor(year))
    }
}
