//! Cost strategies: one algorithm per cost domain and vehicle type.
//!
//! Every strategy computes the nominal cost incurred in a single analysis year. Strategies are
//! resolved through the [`StrategyRegistry`](crate::registry::StrategyRegistry) so that
//! alternative implementations can be selected per scenario.
use crate::error::TcoResult;
use crate::scenario::ScenarioInput;
use crate::units::Money;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod acquisition;
pub mod battery;
pub mod energy;
pub mod infrastructure;
pub mod insurance;
pub mod maintenance;
pub mod residual;
pub mod taxes;

/// The cost domains computed for every analysis year.
///
/// Each domain maps onto exactly one field of [`AnnualCosts`](crate::costs::AnnualCosts).
#[derive(
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Debug,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CostDomain {
    /// Purchase or loan repayments
    Acquisition,
    /// Fuel or electricity
    Energy,
    /// Maintenance and repair
    Maintenance,
    /// Charging or fuelling infrastructure
    Infrastructure,
    /// Traction battery replacement
    BatteryReplacement,
    /// Insurance premiums
    Insurance,
    /// Registration fees
    Registration,
    /// Tax on tailpipe CO2
    CarbonTax,
    /// Road user charges and levies
    OtherTaxes,
    /// Resale value at the end of the period (negative)
    ResidualValue,
}

impl CostDomain {
    /// Whether costs in this domain are income and so must not be positive
    pub fn is_income(self) -> bool {
        self == Self::ResidualValue
    }
}

/// A cost algorithm for one domain.
///
/// Implementations must be pure: the same scenario and year always give the same value.
pub trait CostStrategy: Debug + Send + Sync {
    /// Calculate the nominal cost incurred in `year` (0-based) of the analysis period.
    ///
    /// Returns an error if `year` lies outside the analysis period.
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money>;
}

/// A strategy for domains that never apply to a vehicle type
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroCost;

impl CostStrategy for ZeroCost {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;
        Ok(Money(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::diesel_scenario;
    use rstest::rstest;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_domain_names() {
        assert_eq!(CostDomain::BatteryReplacement.to_string(), "battery_replacement");
        assert_eq!(
            CostDomain::from_str("other_taxes").unwrap(),
            CostDomain::OtherTaxes
        );
        assert_eq!(CostDomain::iter().count(), 10);
        assert_eq!(CostDomain::iter().filter(|d| d.is_income()).count(), 1);
    }

    #[rstest]
    fn test_zero_cost(diesel_scenario: ScenarioInput) {
        assert_eq!(
            ZeroCost.calculate_costs(&diesel_scenario, 0).unwrap(),
            Money(0.0)
        );
        assert!(ZeroCost.calculate_costs(&diesel_scenario, 5).is_err());
    }
}
