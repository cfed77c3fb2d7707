//! Acquisition costs, with the financing overlay applied.
use super::CostStrategy;
use crate::error::TcoResult;
use crate::finance::{loan_payment, outstanding_balance};
use crate::scenario::{FinancingMethod, ScenarioInput};
use crate::units::{Dimensionless, Money};

/// Purchase paid in cash or through a loan, depending on the scenario's financing method.
///
/// With a loan, the down payment falls in the first year and the annuity repayments in each
/// year of the loan term. If the loan runs beyond the analysis period, the outstanding balance
/// is settled in the final year.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancedAcquisition;

impl FinancedAcquisition {
    fn loan_cash_flow(scenario: &ScenarioInput, year: u32) -> Money {
        let financing = &scenario.economic.financing;
        let net_price = scenario.net_purchase_price();
        let down_payment = net_price * financing.down_payment_fraction;
        let principal = net_price * (Dimensionless(1.0) - financing.down_payment_fraction);
        let term = financing.loan_term_years;

        let mut cost = Money(0.0);
        if year == 0 {
            cost += down_payment;
        }
        if year < term {
            cost += loan_payment(principal, financing.interest_rate, term);
        }
        if year == scenario.period() - 1 && term > scenario.period() {
            cost += outstanding_balance(principal, financing.interest_rate, term, year + 1);
        }

        cost
    }
}

impl CostStrategy for FinancedAcquisition {
    fn calculate_costs(&self, scenario: &ScenarioInput, year: u32) -> TcoResult<Money> {
        scenario.check_year(year)?;

        Ok(match scenario.economic.financing.method {
            FinancingMethod::Cash if year == 0 => scenario.net_purchase_price(),
            FinancingMethod::Cash => Money(0.0),
            FinancingMethod::Loan => Self::loan_cash_flow(scenario, year),
        })
    }
}
