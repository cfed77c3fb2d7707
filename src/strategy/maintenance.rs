//! Maintenance and repair costs.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::scenario::{ScenarioInput, escalation_factor};
use crate::units::{Dimensionless, Money};

/// The name of the fixed-rate maintenance implementation
pub const FIXED_RATE_IMPLEMENTATION: &str = "fixed_rate";

/// Maintenance cost multiplier for the scenario's vehicle
fn type_multiplier(scenario: &ScenarioInput) -> Dimensionless {
    scenario
        .costs
        .maintenance
        .type_multiplier
        .unwrap_or_else(|| scenario.vehicle_type().default_maintenance_multiplier())
}

/// Maintenance that scales with distance and rises as the vehicle ages
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceBasedMaintenance;

impl CostStrategy for DistanceBasedMaintenance {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let params = &scenario.costs.maintenance;
        let variable = params.cost_per_km
            * scenario.annual_distance(year)
            * escalation_factor(params.age_escalation, year);
        let fixed = params.annual_fixed_cost * scenario.inflation_factor(year);

        Ok((variable + fixed) * type_multiplier(scenario))
    }
}

/// Maintenance contract at a fixed annual rate, independent of distance
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRateMaintenance;

impl CostStrategy for FixedRateMaintenance {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        let params = &scenario.costs.maintenance;
        Ok(params.annual_fixed_cost * scenario.inflation_factor(year) * type_multiplier(scenario))
    }
}
