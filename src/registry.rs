//! The registry used to look up cost strategies.
//!
//! Strategies are registered once against a key made of a cost domain plus an optional vehicle
//! type and an optional implementation name. Lookups fall back from the most specific key to the
//! domain default:
//!
//! 1. domain, vehicle type and implementation
//! 2. domain and vehicle type
//! 3. domain and implementation
//! 4. domain only
use crate::error::{TcoError, TcoResult};
use crate::scenario::{ImplementationID, ScenarioInput, VehicleType};
use crate::strategy::acquisition::FinancedAcquisition;
use crate::strategy::battery::ScheduledBatteryReplacement;
use crate::strategy::energy::{DieselFuelCost, ElectricityCost};
use crate::strategy::infrastructure::{
    AmortisedChargerCost, DepotFuellingCost, UPFRONT_IMPLEMENTATION, UpfrontChargerCost,
};
use crate::strategy::insurance::{AnnualRegistrationFee, ValueBasedInsurance};
use crate::strategy::maintenance::{
    DistanceBasedMaintenance, FIXED_RATE_IMPLEMENTATION, FixedRateMaintenance,
};
use crate::strategy::residual::DepreciatedResidualValue;
use crate::strategy::taxes::{EmissionsCarbonTax, RoadUserCharges};
use crate::strategy::{CostDomain, CostStrategy, ZeroCost};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;

/// A shared, thread-safe reference to a strategy
pub type StrategyRef = Arc<dyn CostStrategy>;

/// The key under which a strategy is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrategyKey {
    /// The cost domain
    pub domain: CostDomain,
    /// The vehicle type, or `None` to apply to all vehicle types
    pub vehicle_type: Option<VehicleType>,
    /// The implementation name, or `None` to apply to all implementations
    pub implementation: Option<ImplementationID>,
}

impl StrategyKey {
    /// Create a new [`StrategyKey`]
    pub fn new(
        domain: CostDomain,
        vehicle_type: Option<VehicleType>,
        implementation: Option<&str>,
    ) -> Self {
        Self {
            domain,
            vehicle_type,
            implementation: implementation.map(ImplementationID::new),
        }
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vehicle_type = self
            .vehicle_type
            .map_or_else(|| "any".to_string(), |vt| vt.to_string());
        let implementation = self
            .implementation
            .as_ref()
            .map_or("any", ImplementationID::as_str);
        write!(
            f,
            "vehicle type {vehicle_type}, implementation {implementation}"
        )
    }
}

/// The strategies resolved for one scenario, one per cost domain
pub type ResolvedStrategies = IndexMap<CostDomain, StrategyRef>;

/// Maps strategy keys onto strategies
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<StrategyKey, StrategyRef>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.strategies.keys().map(|key| format!("{}: {key}", key.domain)))
            .finish()
    }
}

impl StrategyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing the built-in strategies
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let mut add = |domain: CostDomain,
                       vehicle_type: Option<VehicleType>,
                       implementation: Option<&str>,
                       strategy: StrategyRef| {
            registry
                .register(
                    StrategyKey::new(domain, vehicle_type, implementation),
                    strategy,
                )
                .expect("Built-in strategies have unique keys");
        };

        let diesel = Some(VehicleType::Diesel);
        let electric = Some(VehicleType::BatteryElectric);
        add(CostDomain::Acquisition, None, None, Arc::new(FinancedAcquisition));
        add(CostDomain::Energy, diesel, None, Arc::new(DieselFuelCost));
        add(CostDomain::Energy, electric, None, Arc::new(ElectricityCost));
        add(
            CostDomain::Maintenance,
            None,
            None,
            Arc::new(DistanceBasedMaintenance),
        );
        add(
            CostDomain::Maintenance,
            None,
            Some(FIXED_RATE_IMPLEMENTATION),
            Arc::new(FixedRateMaintenance),
        );
        add(
            CostDomain::Infrastructure,
            diesel,
            None,
            Arc::new(DepotFuellingCost),
        );
        add(
            CostDomain::Infrastructure,
            electric,
            None,
            Arc::new(AmortisedChargerCost),
        );
        add(
            CostDomain::Infrastructure,
            electric,
            Some(UPFRONT_IMPLEMENTATION),
            Arc::new(UpfrontChargerCost),
        );
        add(CostDomain::BatteryReplacement, None, None, Arc::new(ZeroCost));
        add(
            CostDomain::BatteryReplacement,
            electric,
            None,
            Arc::new(ScheduledBatteryReplacement),
        );
        add(CostDomain::Insurance, None, None, Arc::new(ValueBasedInsurance));
        add(
            CostDomain::Registration,
            None,
            None,
            Arc::new(AnnualRegistrationFee),
        );
        add(CostDomain::CarbonTax, None, None, Arc::new(EmissionsCarbonTax));
        add(CostDomain::OtherTaxes, None, None, Arc::new(RoadUserCharges));
        add(
            CostDomain::ResidualValue,
            None,
            None,
            Arc::new(DepreciatedResidualValue),
        );

        registry
    }

    /// Register a strategy.
    ///
    /// Registration is write-once: a key cannot be registered twice.
    pub fn register(&mut self, key: StrategyKey, strategy: StrategyRef) -> TcoResult<()> {
        if self.strategies.contains_key(&key) {
            return Err(TcoError::DuplicateRegistration {
                domain: key.domain,
                key: key.to_string(),
            });
        }

        self.strategies.insert(key, strategy);
        Ok(())
    }

    /// Number of registered strategies
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategies are registered
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Look up the strategy for a domain, vehicle type and implementation
    pub fn resolve(
        &self,
        domain: CostDomain,
        vehicle_type: VehicleType,
        implementation: &ImplementationID,
    ) -> TcoResult<StrategyRef> {
        let candidates = [
            (Some(vehicle_type), Some(implementation)),
            (Some(vehicle_type), None),
            (None, Some(implementation)),
            (None, None),
        ];

        for (vehicle_type, implementation) in candidates {
            let key = StrategyKey {
                domain,
                vehicle_type,
                implementation: implementation.cloned(),
            };
            if let Some(strategy) = self.strategies.get(&key) {
                return Ok(Arc::clone(strategy));
            }
        }

        Err(TcoError::Configuration {
            domain,
            vehicle_type,
            implementation: implementation.to_string(),
        })
    }

    /// Resolve a strategy for every cost domain for the given scenario.
    ///
    /// Each domain follows the same fallback order as [`StrategyRegistry::resolve`], so an
    /// implementation which is not registered for the vehicle type falls back to a less specific
    /// strategy.
    pub fn resolve_for_scenario(&self, scenario: &ScenarioInput) -> TcoResult<ResolvedStrategies> {
        let vehicle_type = scenario.vehicle_type();
        CostDomain::iter()
            .map(|domain| {
                let implementation = scenario.implementation(domain);
                let strategy = self.resolve(domain, vehicle_type, &implementation)?;
                Ok((domain, strategy))
            })
            .collect()
    }
}
