//! Residual value of the vehicle at the end of the analysis period.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::ScenarioInput;
use crate::units::Money;

/// Resale at depreciated market value in the final year, recorded as a negative cost
#[derive(Debug, Clone, Copy, Default)]
pub struct DepreciatedResidualValue;

impl CostStrategy for DepreciatedResidualValue {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let final_year = scenario.period() - 1;
        if year != final_year {
            return Ok(Money(0.0));
        }

        Ok(-scenario.vehicle_value(scenario.period()))
    }
}
