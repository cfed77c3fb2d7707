//! Aggregation of strategy outputs into per-year cost records.
use crate::costs::{AnnualCosts, AnnualCostsCollection};
use crate::error::{TcoError, TcoResult};
use crate::registry::ResolvedStrategies;
use crate::scenario::ScenarioInput;
use crate::strategy::CostDomain;
use crate::units::Money;

/// Check that a strategy's output is finite and has the expected sign
fn check_cost_value(domain: CostDomain, year: u32, value: Money) -> TcoResult<()> {
    if !value.is_finite() {
        return Err(TcoError::computation(
            format!("{domain} costs in year {year}"),
            format!("result is not finite ({})", value.value()),
        ));
    }

    let sign_ok = if domain.is_income() {
        value <= Money(0.0)
    } else {
        value >= Money(0.0)
    };
    if !sign_ok {
        let expected = if domain.is_income() {
            "non-positive"
        } else {
            "non-negative"
        };
        return Err(TcoError::computation(
            format!("{domain} costs in year {year}"),
            format!("expected a {expected} value but got {}", value.value()),
        ));
    }

    Ok(())
}

/// Run every resolved strategy for every year of the analysis period.
///
/// # Arguments
///
/// * `scenario` - The scenario being costed
/// * `strategies` - One strategy for each cost domain
///
/// # Returns
///
/// One [`AnnualCosts`] per analysis year, in order.
pub fn aggregate_annual_costs(
    scenario: &ScenarioInput,
    strategies: &ResolvedStrategies,
) -> TcoResult<AnnualCostsCollection> {
    let base_year = scenario.operational.base_year;
    let mut years = Vec::with_capacity(scenario.period() as usize);

    for year in 0..scenario.period() {
        let mut annual = AnnualCosts::new(year, base_year + year, scenario.annual_distance(year));
        for (domain, strategy) in strategies {
            let value = strategy.calculate_costs(scenario, year)?;
            check_cost_value(*domain, year, value)?;
            *annual.costs.get_mut(*domain) = value;
        }
        years.push(annual);
    }

    Ok(AnnualCostsCollection::new(years))
}
