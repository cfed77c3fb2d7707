//! General functions related to finance.
use crate::units::{Dimensionless, Money};

/// Calculates the capital recovery factor (CRF) for a given lifetime and discount rate.
///
/// The CRF is used to annualise capital costs over the lifetime of an asset.
pub fn capital_recovery_factor(lifetime: u32, discount_rate: Dimensionless) -> Dimensionless {
    if lifetime == 0 {
        return Dimensionless(0.0);
    }
    if discount_rate == Dimensionless(0.0) {
        return Dimensionless(1.0) / Dimensionless(lifetime as f64);
    }
    let factor = (Dimensionless(1.0) + discount_rate).powi(lifetime as i32);
    (discount_rate * factor) / (factor - Dimensionless(1.0))
}

/// Calculates the equivalent annual cost of a capital outlay
pub fn annual_capital_cost(capital_cost: Money, lifetime: u32, discount_rate: Dimensionless) -> Money {
    let crf = capital_recovery_factor(lifetime, discount_rate);
    capital_cost * crf
}

/// The factor `1 / (1 + r)^t` by which a cost incurred in `year` is discounted
pub fn discount_factor(discount_rate: Dimensionless, year: u32) -> Dimensionless {
    Dimensionless(1.0) / (Dimensionless(1.0) + discount_rate).powi(year as i32)
}

/// The present value of a cost incurred in `year`
pub fn present_value(amount: Money, discount_rate: Dimensionless, year: u32) -> Money {
    amount * discount_factor(discount_rate, year)
}

/// The annual repayment of an amortising loan
pub fn loan_payment(principal: Money, interest_rate: Dimensionless, term: u32) -> Money {
    annual_capital_cost(principal, term, interest_rate)
}

/// The principal still owed on an amortising loan after `payments_made` annual payments
pub fn outstanding_balance(
    principal: Money,
    interest_rate: Dimensionless,
    term: u32,
    payments_made: u32,
) -> Money {
    if payments_made >= term {
        return Money(0.0);
    }
    let payment = loan_payment(principal, interest_rate, term);
    if interest_rate == Dimensionless(0.0) {
        return principal - payment * Dimensionless(payments_made as f64);
    }

    let growth = (Dimensionless(1.0) + interest_rate).powi(payments_made as i32);
    principal * growth - payment * ((growth - Dimensionless(1.0)) / interest_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.05, 0.0)] // Edge case: lifetime==0
    #[case(10, 0.0, 0.1)] // Other edge case: discount_rate==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(5, 0.03, 0.2183545714005762)]
    fn test_capital_recovery_factor(
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = capital_recovery_factor(lifetime, Dimensionless(discount_rate));
        assert_approx_eq!(f64, result.0, expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(1000.0, 10, 0.05, 129.5045749654567)]
    #[case(500.0, 5, 0.03, 109.17728570028798)]
    #[case(1000.0, 0, 0.05, 0.0)] // Zero lifetime
    #[case(2000.0, 20, 0.0, 100.0)] // Zero discount rate
    fn test_annual_capital_cost(
        #[case] capital_cost: f64,
        #[case] lifetime: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = annual_capital_cost(Money(capital_cost), lifetime, Dimensionless(discount_rate));
        assert_approx_eq!(Money, result, Money(expected), epsilon = 1e-8);
    }

    #[rstest]
    #[case(0.07, 0, 1.0)]
    #[case(0.1, 1, 1.0 / 1.1)]
    #[case(0.1, 2, 1.0 / 1.21)]
    #[case(0.0, 7, 1.0)]
    fn test_discount_factor(#[case] rate: f64, #[case] year: u32, #[case] expected: f64) {
        assert_approx_eq!(
            Dimensionless,
            discount_factor(Dimensionless(rate), year),
            Dimensionless(expected),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_present_value() {
        assert_approx_eq!(
            Money,
            present_value(Money(121.0), Dimensionless(0.1), 2),
            Money(100.0),
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case(0, 1000.0)]
    #[case(5, 0.0)]
    #[case(6, 0.0)]
    fn test_outstanding_balance_bounds(#[case] payments_made: u32, #[case] expected: f64) {
        let balance = outstanding_balance(Money(1000.0), Dimensionless(0.05), 5, payments_made);
        assert_approx_eq!(Money, balance, Money(expected), epsilon = 1e-9);
    }

    #[test]
    fn test_outstanding_balance_after_one_payment() {
        // 1000 at 10% over 2 years: payment = 576.19..., balance = 1100 - 576.19... = 523.80...
        let payment = loan_payment(Money(1000.0), Dimensionless(0.1), 2);
        assert_approx_eq!(Money, payment, Money(576.190_476_190_476_2), epsilon = 1e-9);
        let balance = outstanding_balance(Money(1000.0), Dimensionless(0.1), 2, 1);
        assert_approx_eq!(Money, balance, Money(1100.0) - payment, epsilon = 1e-9);
    }

    #[test]
    fn test_outstanding_balance_zero_interest() {
        let balance = outstanding_balance(Money(1000.0), Dimensionless(0.0), 4, 1);
        assert_approx_eq!(Money, balance, Money(750.0), epsilon = 1e-9);
    }
}
