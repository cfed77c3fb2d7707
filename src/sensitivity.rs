//! Sensitivity analysis: re-running the calculator with one parameter varied at a time.
use crate::calculator::{TcoCalculator, TcoOutput};
use crate::error::{TcoError, TcoResult};
use crate::scenario::ScenarioInput;
use crate::units::{
    Dimensionless, Distance, Money, MoneyPerDistance, MoneyPerEmissions, MoneyPerEnergy,
};
use indexmap::IndexMap;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A scenario parameter which can be varied in a sensitivity analysis
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
pub enum SensitivityParameter {
    /// Distance driven each year
    AnnualDistanceKm,
    /// Length of the analysis period (whole years)
    AnalysisPeriodYears,
    /// Discount rate
    DiscountRate,
    /// General inflation
    InflationRate,
    /// Energy price in the first year
    EnergyPrice,
    /// Annual energy price escalation
    EnergyPriceEscalation,
    /// Carbon price in the first year
    CarbonPrice,
    /// Purchase price of the vehicle
    PurchasePrice,
    /// Average payload as a proportion of maximum
    LoadFactor,
    /// Baseline maintenance cost per km
    MaintenanceCostPerKm,
    /// Replacement battery cost per kWh
    BatteryReplacementCostPerKwh,
    /// Insurance premium as a proportion of vehicle value
    InsuranceRate,
    /// Annual depreciation rate
    DepreciationRate,
}

impl SensitivityParameter {
    /// The value of this parameter in `scenario`
    pub fn baseline_value(self, scenario: &ScenarioInput) -> TcoResult<f64> {
        let value = match self {
            Self::AnnualDistanceKm => scenario.operational.annual_distance_km.value(),
            Self::AnalysisPeriodYears => f64::from(scenario.operational.analysis_period_years),
            Self::DiscountRate => scenario.economic.discount_rate.value(),
            Self::InflationRate => scenario.economic.inflation_rate.value(),
            Self::EnergyPrice => scenario.economic.energy_price.value(),
            Self::EnergyPriceEscalation => scenario.economic.energy_price_escalation.value(),
            Self::CarbonPrice => scenario.economic.carbon_price.value(),
            Self::PurchasePrice => scenario.vehicle.purchase_price.value(),
            Self::LoadFactor => scenario.operational.load_factor.value(),
            Self::MaintenanceCostPerKm => scenario.costs.maintenance.cost_per_km.value(),
            Self::BatteryReplacementCostPerKwh => scenario
                .vehicle
                .battery
                .as_ref()
                .ok_or_else(|| {
                    TcoError::validation(self.to_string(), "the vehicle has no battery")
                })?
                .replacement_cost_per_kwh
                .value(),
            Self::InsuranceRate => scenario.costs.insurance.rate.value(),
            Self::DepreciationRate => scenario.costs.residual.depreciation_rate.value(),
        };

        Ok(value)
    }

    /// Override this parameter in `scenario`.
    ///
    /// Only checks which can't be left to [`ScenarioInput::validate`] are done here. Setting the
    /// annual distance removes any per-year distance schedule.
    pub fn apply(self, scenario: &mut ScenarioInput, value: f64) -> TcoResult<()> {
        if !value.is_finite() {
            return Err(self.invalid(value, "value must be finite"));
        }

        match self {
            Self::AnnualDistanceKm => {
                scenario.operational.annual_distance_km = Distance(value);
                scenario.operational.distance_schedule_km = None;
            }
            Self::AnalysisPeriodYears => {
                if value < 1.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
                    return Err(self.invalid(value, "value must be a whole number of years"));
                }
                scenario.operational.analysis_period_years = value as u32;
            }
            Self::DiscountRate => scenario.economic.discount_rate = Dimensionless(value),
            Self::InflationRate => scenario.economic.inflation_rate = Dimensionless(value),
            Self::EnergyPrice => scenario.economic.energy_price = MoneyPerEnergy(value),
            Self::EnergyPriceEscalation => {
                scenario.economic.energy_price_escalation = Dimensionless(value);
            }
            Self::CarbonPrice => scenario.economic.carbon_price = MoneyPerEmissions(value),
            Self::PurchasePrice => scenario.vehicle.purchase_price = Money(value),
            Self::LoadFactor => scenario.operational.load_factor = Dimensionless(value),
            Self::MaintenanceCostPerKm => {
                scenario.costs.maintenance.cost_per_km = MoneyPerDistance(value);
            }
            Self::BatteryReplacementCostPerKwh => {
                let battery = scenario
                    .vehicle
                    .battery
                    .as_mut()
                    .ok_or_else(|| self.invalid(value, "the vehicle has no battery"))?;
                battery.replacement_cost_per_kwh = MoneyPerEnergy(value);
            }
            Self::InsuranceRate => scenario.costs.insurance.rate = Dimensionless(value),
            Self::DepreciationRate => {
                scenario.costs.residual.depreciation_rate = Dimensionless(value);
            }
        }

        Ok(())
    }

    /// Whether this parameter only takes whole-number values
    pub fn is_whole_number(self) -> bool {
        matches!(self, Self::AnalysisPeriodYears)
    }

    /// Values to sweep this parameter over, within `fraction` either side of `baseline`.
    ///
    /// Whole-number parameters are rounded to distinct values of at least one, so fewer than
    /// `steps` values may be returned.
    pub fn variation_values(self, baseline: f64, fraction: f64, steps: usize) -> Vec<f64> {
        let values = variation_values(baseline, fraction, steps);
        if !self.is_whole_number() {
            return values;
        }

        values
            .into_iter()
            .map(|value| value.round().max(1.0))
            .dedup()
            .collect()
    }

    fn invalid(self, value: f64, reason: &str) -> TcoError {
        TcoError::validation(self.to_string(), format!("cannot set to {value}: {reason}"))
    }
}

/// The results of varying one parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    /// The parameter which was varied
    pub parameter: SensitivityParameter,
    /// The values the parameter took
    pub values: Vec<f64>,
    /// Total TCO for each value
    pub tco: Vec<Money>,
    /// Levelised cost of driving for each value
    pub lcod: Vec<MoneyPerDistance>,
    /// Total TCO of the unchanged scenario
    pub baseline_tco: Money,
    /// LCOD of the unchanged scenario
    pub baseline_lcod: MoneyPerDistance,
}

/// Generate `steps` evenly spaced values within `fraction` either side of `baseline`.
///
/// A single step gives just the baseline.
pub fn variation_values(baseline: f64, fraction: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![baseline],
        _ => {
            let low = baseline * (1.0 - fraction);
            let high = baseline * (1.0 + fraction);
            let step = (high - low) / (steps - 1) as f64;
            (0..steps).map(|i| low + step * i as f64).collect()
        }
    }
}

/// Run the calculator once for each value of `parameter`.
///
/// Points are evaluated in parallel but results are returned in the order of `values`. If any
/// override is invalid, the whole analysis fails with the error for the first such value.
pub fn analyse(
    calculator: &TcoCalculator,
    scenario: &ScenarioInput,
    parameter: SensitivityParameter,
    values: &[f64],
) -> TcoResult<SensitivityResult> {
    let baseline = calculator.calculate(scenario.clone())?;
    analyse_with_baseline(calculator, scenario, &baseline, parameter, values)
}

/// Run a separate analysis for each parameter, keyed by parameter.
///
/// Parameters are varied independently of one another.
pub fn analyse_many(
    calculator: &TcoCalculator,
    scenario: &ScenarioInput,
    sweeps: &[(SensitivityParameter, Vec<f64>)],
) -> TcoResult<IndexMap<SensitivityParameter, SensitivityResult>> {
    let baseline = calculator.calculate(scenario.clone())?;
    sweeps
        .iter()
        .map(|(parameter, values)| {
            let result =
                analyse_with_baseline(calculator, scenario, &baseline, *parameter, values)?;
            Ok((*parameter, result))
        })
        .collect()
}

fn analyse_with_baseline(
    calculator: &TcoCalculator,
    scenario: &ScenarioInput,
    baseline: &TcoOutput,
    parameter: SensitivityParameter,
    values: &[f64],
) -> TcoResult<SensitivityResult> {
    let scenarios = values
        .iter()
        .map(|value| {
            let mut varied = scenario.clone();
            parameter.apply(&mut varied, *value)?;
            Ok(varied)
        })
        .collect::<TcoResult<Vec<_>>>()?;

    let outputs: Vec<TcoResult<TcoOutput>> = scenarios
        .into_par_iter()
        .map(|varied| calculator.calculate(varied))
        .collect();

    let mut tco = Vec::with_capacity(values.len());
    let mut lcod = Vec::with_capacity(values.len());
    for output in outputs {
        let output = output?;
        tco.push(output.total_tco);
        lcod.push(output.lcod);
    }

    Ok(SensitivityResult {
        parameter,
        values: values.to_vec(),
        tco,
        lcod,
        baseline_tco: baseline.total_tco,
        baseline_lcod: baseline.lcod,
    })
}
