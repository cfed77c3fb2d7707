//! Comparison of the TCO of two vehicles.
use crate::calculator::TcoOutput;
use crate::costs::ComponentKey;
use crate::units::{Money, MoneyPerDistance};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which of two compared options is cheaper
#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonOption {
    /// The first (baseline) option
    First,
    /// The second option
    Second,
}

/// The differences between two TCO results.
///
/// All differences are the second option's value minus the first option's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The baseline option
    pub option1: TcoOutput,
    /// The alternative option
    pub option2: TcoOutput,
    /// Difference in total TCO
    pub tco_difference: Money,
    /// Difference in total TCO as a percentage of the first option's TCO
    pub tco_percentage: f64,
    /// Difference in levelised cost of driving
    pub lcod_difference: MoneyPerDistance,
    /// Difference in LCOD as a percentage of the first option's LCOD
    pub lcod_percentage: f64,
    /// First year in which the first option's cumulative nominal cost is below the second's
    pub payback_year: Option<u32>,
    /// The option with the lower TCO
    pub cheaper_option: ComparisonOption,
    /// Difference in present value of each standard and combined component
    pub component_differences: IndexMap<String, Money>,
}

impl ComparisonResult {
    /// The result for the cheaper option
    pub fn cheaper(&self) -> &TcoOutput {
        match self.cheaper_option {
            ComparisonOption::First => &self.option1,
            ComparisonOption::Second => &self.option2,
        }
    }

    /// Absolute TCO saving of the cheaper option
    pub fn savings(&self) -> Money {
        self.tco_difference.abs()
    }
}

/// `difference` as a percentage of `baseline`, or zero if `baseline` is zero
fn percentage(difference: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        100.0 * difference / baseline.abs()
    }
}

/// Find the first year in which cumulative cost `a` falls below cumulative cost `b`.
///
/// Only years present in both series are considered.
pub fn find_payback_year(cumulative_a: &[Money], cumulative_b: &[Money]) -> Option<u32> {
    cumulative_a
        .iter()
        .zip(cumulative_b)
        .position(|(a, b)| a < b)
        .map(|year| year as u32)
}

/// Compare two TCO results.
///
/// On an exact tie in total TCO the first option is reported as cheaper, as there is no case
/// for switching away from the baseline.
pub fn compare(result1: TcoOutput, result2: TcoOutput) -> ComparisonResult {
    let tco_difference = result2.total_tco - result1.total_tco;
    let lcod_difference = result2.lcod - result1.lcod;
    let cheaper_option = if tco_difference < Money(0.0) {
        ComparisonOption::Second
    } else {
        ComparisonOption::First
    };

    let component_differences = ComponentKey::all()
        .map(|key| {
            let difference =
                key.value(&result2.npv_costs.costs) - key.value(&result1.npv_costs.costs);
            (key.to_string(), difference)
        })
        .collect();

    let payback_year = find_payback_year(
        &result1.annual_costs.cumulative_totals(),
        &result2.annual_costs.cumulative_totals(),
    );

    ComparisonResult {
        tco_percentage: percentage(tco_difference.value(), result1.total_tco.value()),
        lcod_percentage: percentage(lcod_difference.value(), result1.lcod.value()),
        tco_difference,
        lcod_difference,
        payback_year,
        cheaper_option,
        component_differences,
        option1: result1,
        option2: result2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::TcoCalculator;
    use crate::fixture::{diesel_scenario, electric_scenario};
    use crate::registry::StrategyRegistry;
    use crate::scenario::ScenarioInput;
    use float_cmp::assert_approx_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn outputs(
        diesel_scenario: ScenarioInput,
        electric_scenario: ScenarioInput,
    ) -> (TcoOutput, TcoOutput) {
        let registry = StrategyRegistry::with_defaults();
        let calculator = TcoCalculator::new(&registry);
        (
            calculator.calculate(diesel_scenario).unwrap(),
            calculator.calculate(electric_scenario).unwrap(),
        )
    }

    #[rstest]
    fn test_compare_antisymmetric(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, electric) = outputs;
        let forward = compare(diesel.clone(), electric.clone());
        let backward = compare(electric, diesel);

        assert_approx_eq!(
            Money,
            forward.tco_difference,
            -backward.tco_difference,
            epsilon = 1e-6
        );
        assert_approx_eq!(
            MoneyPerDistance,
            forward.lcod_difference,
            -backward.lcod_difference,
            epsilon = 1e-9
        );
        for (key, difference) in &forward.component_differences {
            assert_approx_eq!(
                Money,
                *difference,
                -backward.component_differences[key],
                epsilon = 1e-6
            );
        }
        assert_eq!(
            forward.cheaper().vehicle_name,
            backward.cheaper().vehicle_name
        );
    }

    #[rstest]
    fn test_compare_with_itself(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, _) = outputs;
        let result = compare(diesel.clone(), diesel);
        assert_eq!(result.tco_difference, Money(0.0));
        assert_eq!(result.tco_percentage, 0.0);
        assert_eq!(result.cheaper_option, ComparisonOption::First);
        assert_eq!(result.payback_year, None);
    }

    #[rstest]
    fn test_component_differences(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, electric) = outputs;
        let result = compare(diesel.clone(), electric.clone());
        assert_eq!(result.component_differences.len(), 12);

        let taxes = result.component_differences["taxes"];
        let expected = result.component_differences["carbon_tax"]
            + result.component_differences["other_taxes"];
        assert_approx_eq!(Money, taxes, expected, epsilon = 1e-6);

        // Electric vehicles pay no carbon tax
        assert_approx_eq!(
            Money,
            result.component_differences["carbon_tax"],
            -diesel.npv_costs.costs.carbon_tax,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn test_tco_percentage(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, electric) = outputs;
        let result = compare(diesel.clone(), electric.clone());
        let expected = 100.0 * (electric.total_tco.value() - diesel.total_tco.value())
            / diesel.total_tco.value();
        assert_approx_eq!(f64, result.tco_percentage, expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(&[10.0, 20.0, 30.0], &[5.0, 25.0, 35.0], Some(1))]
    #[case(&[1.0, 2.0], &[2.0, 3.0], Some(0))]
    #[case(&[10.0, 20.0], &[5.0, 15.0], None)]
    #[case(&[10.0, 20.0, 1.0], &[5.0, 25.0], Some(1))] // Common prefix only
    #[case(&[10.0, 20.0, 1.0], &[5.0, 15.0], None)]
    #[case(&[5.0], &[5.0], None)] // Equal is not below
    fn test_find_payback_year(
        #[case] a: &[f64],
        #[case] b: &[f64],
        #[case] expected: Option<u32>,
    ) {
        let a: Vec<_> = a.iter().copied().map(Money).collect();
        let b: Vec<_> = b.iter().copied().map(Money).collect();
        assert_eq!(find_payback_year(&a, &b), expected);
    }

    #[rstest]
    fn test_payback_crossing_property(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, electric) = outputs;
        for (first, second) in [
            (electric.clone(), diesel.clone()),
            (diesel.clone(), electric.clone()),
        ] {
            let cumulative1 = first.annual_costs.cumulative_totals();
            let cumulative2 = second.annual_costs.cumulative_totals();
            let result = compare(first, second);
            if let Some(year) = result.payback_year {
                let t = year as usize;
                assert!(cumulative1[t] < cumulative2[t]);
                assert!(t == 0 || cumulative1[t - 1] >= cumulative2[t - 1]);
            }
        }
    }

    #[rstest]
    fn test_serde_round_trip(outputs: (TcoOutput, TcoOutput)) {
        let (diesel, electric) = outputs;
        let result = compare(diesel, electric);
        let json = serde_json::to_string(&result).unwrap();
        let restored: ComparisonResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, result);
    }
}
