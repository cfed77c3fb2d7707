//! Discounting of annual costs to present values.
use crate::costs::{AnnualCostsCollection, CostBreakdown, NpvCosts};
use crate::error::{TcoError, TcoResult};
use crate::finance::present_value;
use crate::units::{Dimensionless, Distance, Money, MoneyPerDistance};

/// Discount every year's costs to the start of the analysis period.
///
/// The cost in year `t` is divided by `(1 + r)^t`. Residual value is discounted like any other
/// component and so reduces the total.
pub fn discount_costs(
    annual_costs: &AnnualCostsCollection,
    discount_rate: Dimensionless,
) -> TcoResult<NpvCosts> {
    if !(discount_rate.is_finite() && discount_rate > Dimensionless(-1.0)) {
        return Err(TcoError::computation(
            "present values",
            format!(
                "discount rate must be greater than -1 (got {})",
                discount_rate.value()
            ),
        ));
    }

    let mut discounted = CostBreakdown::default();
    for annual in annual_costs {
        for (domain, value) in annual.costs.iter() {
            *discounted.get_mut(domain) += present_value(value, discount_rate, annual.year);
        }
    }

    Ok(NpvCosts::new(discounted))
}

/// The levelised cost of driving: total TCO per km driven over the period
pub fn levelised_cost_of_driving(
    total_tco: Money,
    lifetime_distance: Distance,
) -> TcoResult<MoneyPerDistance> {
    if !(lifetime_distance.is_finite() && lifetime_distance > Distance(0.0)) {
        return Err(TcoError::computation(
            "levelised cost of driving",
            "lifetime distance must be greater than zero",
        ));
    }

    Ok(total_tco / lifetime_distance)
}
