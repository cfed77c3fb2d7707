//! Traction battery replacement costs.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::{BatteryParameters, ScenarioInput};
use crate::units::{Dimensionless, Money};

/// Whether a battery replacement falls due in `year`.
///
/// Replacements happen every `life_years` after purchase. A replacement due at the very end of
/// the period (or later) is never bought.
pub fn is_replacement_year(battery: &BatteryParameters, year: u32) -> bool {
    year > 0 && year % battery.life_years == 0
}

/// The years in which the battery is replaced during the analysis period
pub fn replacement_years(scenario: &ScenarioInput) -> Vec<u32> {
    match &scenario.vehicle.battery {
        Some(battery) => (0..scenario.period())
            .filter(|year| is_replacement_year(battery, *year))
            .collect(),
        None => Vec::new(),
    }
}

/// Battery replacements at the end of each battery's expected life
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledBatteryReplacement;

impl CostStrategy for ScheduledBatteryReplacement {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let Some(battery) = &scenario.vehicle.battery else {
            return Ok(Money(0.0));
        };
        if !is_replacement_year(battery, year) {
            return Ok(Money(0.0));
        }

        let price_decline =
            (Dimensionless(1.0) - battery.replacement_cost_decline).powi(year as i32);
        Ok(battery.capacity_kwh * battery.replacement_cost_per_kwh * price_decline)
    }
}
