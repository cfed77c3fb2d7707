//! Per-year and present-value cost records.
use crate::strategy::CostDomain;
use crate::units::{Distance, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use strum::IntoEnumIterator;

/// A value for every cost component.
///
/// Shared by [`AnnualCosts`] and [`NpvCosts`] so that every vehicle type reports the same fixed
/// set of fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Purchase or loan repayments
    pub acquisition: Money,
    /// Fuel or electricity
    pub energy: Money,
    /// Maintenance and repair
    pub maintenance: Money,
    /// Charging or fuelling infrastructure
    pub infrastructure: Money,
    /// Battery replacement
    pub battery_replacement: Money,
    /// Insurance premiums
    pub insurance: Money,
    /// Registration fees
    pub registration: Money,
    /// Tax on tailpipe emissions
    pub carbon_tax: Money,
    /// Road user charges and levies
    pub other_taxes: Money,
    /// Resale value (non-positive)
    pub residual_value: Money,
}

impl CostBreakdown {
    /// The value of one component
    pub fn get(&self, domain: CostDomain) -> Money {
        match domain {
            CostDomain::Acquisition => self.acquisition,
            CostDomain::Energy => self.energy,
            CostDomain::Maintenance => self.maintenance,
            CostDomain::Infrastructure => self.infrastructure,
            CostDomain::BatteryReplacement => self.battery_replacement,
            CostDomain::Insurance => self.insurance,
            CostDomain::Registration => self.registration,
            CostDomain::CarbonTax => self.carbon_tax,
            CostDomain::OtherTaxes => self.other_taxes,
            CostDomain::ResidualValue => self.residual_value,
        }
    }

    /// Mutable access to one component
    pub fn get_mut(&mut self, domain: CostDomain) -> &mut Money {
        match domain {
            CostDomain::Acquisition => &mut self.acquisition,
            CostDomain::Energy => &mut self.energy,
            CostDomain::Maintenance => &mut self.maintenance,
            CostDomain::Infrastructure => &mut self.infrastructure,
            CostDomain::BatteryReplacement => &mut self.battery_replacement,
            CostDomain::Insurance => &mut self.insurance,
            CostDomain::Registration => &mut self.registration,
            CostDomain::CarbonTax => &mut self.carbon_tax,
            CostDomain::OtherTaxes => &mut self.other_taxes,
            CostDomain::ResidualValue => &mut self.residual_value,
        }
    }

    /// The value of a combined component
    pub fn get_combined(&self, combined: CombinedComponent) -> Money {
        combined
            .components()
            .iter()
            .map(|domain| self.get(*domain))
            .sum()
    }

    /// Sum of all components
    pub fn total(&self) -> Money {
        CostDomain::iter().map(|domain| self.get(domain)).sum()
    }

    /// Iterate over `(component, value)` pairs in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = (CostDomain, Money)> + '_ {
        CostDomain::iter().map(|domain| (domain, self.get(domain)))
    }
}

/// Components reported together in summaries
#[derive(
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    Debug,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CombinedComponent {
    /// Insurance plus registration
    InsuranceRegistration,
    /// Carbon tax plus other taxes
    Taxes,
}

impl CombinedComponent {
    /// The standard components which make up this combined component
    pub fn components(self) -> &'static [CostDomain] {
        match self {
            Self::InsuranceRegistration => &[CostDomain::Insurance, CostDomain::Registration],
            Self::Taxes => &[CostDomain::CarbonTax, CostDomain::OtherTaxes],
        }
    }
}

/// Either a standard or a combined component
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum ComponentKey {
    /// A single cost domain
    Standard(CostDomain),
    /// Several cost domains reported together
    Combined(CombinedComponent),
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(domain) => write!(f, "{domain}"),
            Self::Combined(combined) => write!(f, "{combined}"),
        }
    }
}

impl ComponentKey {
    /// Every standard key followed by every combined key
    pub fn all() -> impl Iterator<Item = ComponentKey> {
        CostDomain::iter()
            .map(ComponentKey::Standard)
            .chain(CombinedComponent::iter().map(ComponentKey::Combined))
    }

    /// The value of this component in a breakdown
    pub fn value(self, costs: &CostBreakdown) -> Money {
        match self {
            Self::Standard(domain) => costs.get(domain),
            Self::Combined(combined) => costs.get_combined(combined),
        }
    }
}

/// Costs incurred in a single year of the analysis period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualCosts {
    /// Index of the year within the analysis period (0-based)
    pub year: u32,
    /// Calendar year
    pub calendar_year: u32,
    /// Distance driven in this year
    pub distance_km: Distance,
    /// Nominal (undiscounted) cost of each component
    pub costs: CostBreakdown,
}

impl AnnualCosts {
    /// Create an empty record for the given year
    pub fn new(year: u32, calendar_year: u32, distance_km: Distance) -> Self {
        Self {
            year,
            calendar_year,
            distance_km,
            costs: CostBreakdown::default(),
        }
    }

    /// Total nominal cost in this year
    pub fn total(&self) -> Money {
        self.costs.total()
    }
}

/// The annual costs for every year of the analysis period, in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualCostsCollection(Vec<AnnualCosts>);

impl AnnualCostsCollection {
    /// Create a collection from records sorted by year
    pub fn new(years: Vec<AnnualCosts>) -> Self {
        Self(years)
    }

    /// Number of years
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no years
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record for the given year index, if present
    pub fn get(&self, year: u32) -> Option<&AnnualCosts> {
        self.0.get(year as usize)
    }

    /// Iterate over the yearly records
    pub fn iter(&self) -> std::slice::Iter<'_, AnnualCosts> {
        self.0.iter()
    }

    /// The time series of one component
    pub fn component_series(&self, domain: CostDomain) -> Vec<Money> {
        self.iter().map(|year| year.costs.get(domain)).collect()
    }

    /// The time series of a standard or combined component
    pub fn series(&self, key: ComponentKey) -> Vec<Money> {
        self.iter().map(|year| key.value(&year.costs)).collect()
    }

    /// Nominal total cost in each year
    pub fn totals(&self) -> Vec<Money> {
        self.iter().map(AnnualCosts::total).collect()
    }

    /// Running sum of the nominal total cost
    pub fn cumulative_totals(&self) -> Vec<Money> {
        self.iter()
            .scan(Money(0.0), |acc, year| {
                *acc += year.total();
                Some(*acc)
            })
            .collect()
    }

    /// Sum of the undiscounted costs over all years
    pub fn nominal_total(&self) -> Money {
        self.iter().map(AnnualCosts::total).sum()
    }

    /// Total distance driven over all years
    pub fn total_distance(&self) -> Distance {
        self.iter().map(|year| year.distance_km).sum()
    }
}

impl Index<usize> for AnnualCostsCollection {
    type Output = AnnualCosts;

    fn index(&self, index: usize) -> &AnnualCosts {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a AnnualCostsCollection {
    type Item = &'a AnnualCosts;
    type IntoIter = std::slice::Iter<'a, AnnualCosts>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Present value of each cost component over the whole period
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NpvCosts {
    /// Discounted value of each component
    pub costs: CostBreakdown,
    /// Sum of all components
    pub total: Money,
}

impl NpvCosts {
    /// Create from discounted components, computing the total
    pub fn new(costs: CostBreakdown) -> Self {
        Self {
            total: costs.total(),
            costs,
        }
    }
}
