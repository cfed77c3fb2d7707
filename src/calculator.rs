//! Functionality for calculating the total cost of ownership of a vehicle.
use crate::costs::{AnnualCostsCollection, NpvCosts};
use crate::error::TcoResult;
use crate::registry::StrategyRegistry;
use crate::scenario::{ScenarioInput, VehicleType};
use crate::units::{Distance, Money, MoneyPerDistance};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod aggregate;
use aggregate::aggregate_annual_costs;
pub mod discount;
use discount::{discount_costs, levelised_cost_of_driving};

/// The result of costing a single scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcoOutput {
    /// Display name of the vehicle
    pub vehicle_name: String,
    /// Drivetrain of the vehicle
    pub vehicle_type: VehicleType,
    /// Number of years analysed
    pub analysis_period_years: u32,
    /// Total distance driven over the analysis period
    pub lifetime_distance_km: Distance,
    /// Present value of all costs over the analysis period
    pub total_tco: Money,
    /// Levelised cost of driving
    pub lcod: MoneyPerDistance,
    /// Nominal costs in each year
    pub annual_costs: AnnualCostsCollection,
    /// Present value of each cost component
    pub npv_costs: NpvCosts,
    /// The scenario these results were calculated from
    pub scenario: Arc<ScenarioInput>,
}

/// Calculates [`TcoOutput`]s using the strategies in a registry
#[derive(Debug, Clone, Copy)]
pub struct TcoCalculator<'a> {
    registry: &'a StrategyRegistry,
}

impl<'a> TcoCalculator<'a> {
    /// Create a calculator which resolves strategies from `registry`
    pub fn new(registry: &'a StrategyRegistry) -> Self {
        Self { registry }
    }

    /// Calculate the TCO for a scenario.
    ///
    /// The scenario is validated first and rejected if invalid. A strategy is then resolved for
    /// every cost domain, the annual costs are aggregated and discounted and the levelised cost
    /// of driving is derived from the discounted total.
    ///
    /// # Arguments
    ///
    /// * `scenario` - The scenario to cost
    ///
    /// # Returns
    ///
    /// A fresh [`TcoOutput`] holding a shared reference to `scenario`, or an error if the
    /// scenario is invalid, a strategy can't be resolved or a calculation fails.
    pub fn calculate(&self, scenario: impl Into<Arc<ScenarioInput>>) -> TcoResult<TcoOutput> {
        let scenario = scenario.into();
        scenario.validate()?;

        let strategies = self.registry.resolve_for_scenario(&scenario)?;
        let annual_costs = aggregate_annual_costs(&scenario, &strategies)?;
        let npv_costs = discount_costs(&annual_costs, scenario.economic.discount_rate)?;
        let total_tco = npv_costs.total;
        let lifetime_distance = annual_costs.total_distance();
        let lcod = levelised_cost_of_driving(total_tco, lifetime_distance)?;

        Ok(TcoOutput {
            vehicle_name: scenario.vehicle.name.clone(),
            vehicle_type: scenario.vehicle_type(),
            analysis_period_years: scenario.period(),
            lifetime_distance_km: lifetime_distance,
            total_tco,
            lcod,
            annual_costs,
            npv_costs,
            scenario,
        })
    }
}
