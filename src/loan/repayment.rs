use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money, Rate};
use crate::errors::{CalculatorError, Result};

pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 50;

/// repayment figures for a fixed-rate principal and interest loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRepaymentResult {
    pub loan_amount: Money,
    pub annual_interest_rate_percent: Decimal,
    pub loan_term_years: u32,
    pub monthly_repayment: Money,
    pub annual_repayment: Money,
    pub total_repayment: Money,
    pub total_interest: Money,
    pub number_of_payments: u32,
}

/// reject principal, rate or term outside the supported range
pub fn validate_loan_terms(principal: Money, annual_rate: Rate, term_years: u32) -> Result<()> {
    if !principal.is_positive() {
        return Err(CalculatorError::invalid(
            "loan_amount",
            "loan amount must be greater than 0",
        ));
    }
    if !principal.is_within_input_limit() {
        return Err(CalculatorError::too_large("loan_amount"));
    }

    let percent = annual_rate.as_percentage();
    if percent < Decimal::ZERO || percent > dec!(100) {
        return Err(CalculatorError::invalid(
            "interest_rate",
            "interest rate must be between 0 and 100",
        ));
    }

    if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&term_years) {
        return Err(CalculatorError::invalid(
            "loan_term",
            "loan term must be between 1 and 50 years",
        ));
    }

    Ok(())
}

/// unrounded monthly instalment: P * r(1+r)^n / ((1+r)^n - 1), or P / n at zero rate.
/// the rate ratio is formed before scaling by the principal so it stays small
pub(crate) fn monthly_instalment(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> Result<Money> {
    let months = term_years * 12;
    let r = annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let overflow = || CalculatorError::too_large("loan_amount");
    let factor = annual_rate.monthly_rate().growth_factor(months).ok_or_else(overflow)?;
    let ratio = r
        .checked_mul(factor)
        .and_then(|n| n.checked_div(factor - Decimal::ONE))
        .ok_or_else(overflow)?;

    principal.checked_mul(ratio).ok_or_else(overflow)
}

/// calculate loan repayment details
pub fn calculate_loan_repayments(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
) -> Result<LoanRepaymentResult> {
    validate_loan_terms(principal, annual_rate, term_years)?;

    let number_of_payments = term_years * 12;
    let monthly = monthly_instalment(principal, annual_rate, term_years)?;
    let total_repayment = monthly * Decimal::from(number_of_payments);
    let total_interest = total_repayment - principal;
    let annual_repayment = monthly * dec!(12);

    Ok(LoanRepaymentResult {
        loan_amount: principal.round_whole(),
        annual_interest_rate_percent: annual_rate.as_percentage().normalize(),
        loan_term_years: term_years,
        monthly_repayment: monthly.round_cents(),
        annual_repayment: annual_repayment.round_cents(),
        total_repayment: total_repayment.round_cents(),
        total_interest: total_interest.round_cents(),
        number_of_payments,
    })
}

/// loan-to-value details for a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LvrResult {
    pub lvr: Decimal,
    pub requires_lmi: bool,
    pub deposit: Money,
    pub deposit_percentage: Decimal,
}

/// lenders mortgage insurance is conventionally required above this lvr
pub const LMI_THRESHOLD_PERCENT: Decimal = dec!(80);

/// calculate loan-to-value ratio
pub fn calculate_lvr(loan_amount: Money, property_value: Money) -> Result<LvrResult> {
    if !property_value.is_positive() {
        return Err(CalculatorError::invalid(
            "property_value",
            "property value must be greater than 0",
        ));
    }

    let deposit = property_value
        .checked_sub(loan_amount)
        .ok_or_else(|| CalculatorError::too_large("loan_amount"))?;
    let lvr = loan_amount
        .percent_of(property_value)
        .ok_or_else(|| CalculatorError::too_large("loan_amount"))?;
    let deposit_percentage = deposit
        .percent_of(property_value)
        .ok_or_else(|| CalculatorError::too_large("loan_amount"))?;

    Ok(LvrResult {
        lvr: round_half_up(lvr, 2),
        requires_lmi: lvr > LMI_THRESHOLD_PERCENT,
        deposit: deposit.round_cents(),
        deposit_percentage: round_half_up(deposit_percentage, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standard_thirty_year_loan() {
        let result = calculate_loan_repayments(
            Money::from_major(500_000),
            Rate::from_percent(dec!(6)),
            30,
        )
        .unwrap();

        assert_eq!(result.monthly_repayment, Money::from_minor(299_775));
        assert_eq!(result.number_of_payments, 360);
        assert_eq!(result.annual_repayment, Money::from_minor(3_597_303));
        assert!(result.total_interest > Money::from_major(579_000));
        assert!(result.total_interest < Money::from_major(580_000));
    }

    #[test]
    fn test_zero_rate_is_simple_division() {
        let result = calculate_loan_repayments(Money::from_major(120_000), Rate::ZERO, 10).unwrap();
        assert_eq!(result.monthly_repayment, Money::from_major(1_000));
        assert_eq!(result.total_interest, Money::ZERO);
    }

    #[test]
    fn test_invalid_terms_are_rejected() {
        let rate = Rate::from_percent(dec!(5));
        assert!(calculate_loan_repayments(Money::ZERO, rate, 30).is_err());
        assert!(calculate_loan_repayments(Money::from_major(1), rate, 0).is_err());
        assert!(calculate_loan_repayments(Money::from_major(1), rate, 51).is_err());
        assert!(calculate_loan_repayments(Money::from_major(1), Rate::from_percent(dec!(100.5)), 30).is_err());
        assert!(calculate_loan_repayments(Money::from_major(1), Rate::from_percent(dec!(-1)), 30).is_err());

        let err = calculate_loan_repayments(Money::from_major(-5), rate, 30).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { .. }));
    }

    #[test]
    fn test_extreme_rate_and_term_do_not_overflow() {
        let result = calculate_loan_repayments(
            Money::from_major(2_000_000_000),
            Rate::from_percent(dec!(100)),
            50,
        )
        .unwrap();
        // (1+r)^600 is so large the instalment is almost pure interest
        assert_eq!(result.monthly_repayment, Money::from_minor(16_666_666_667));
        assert_eq!(result.number_of_payments, 600);

        assert!(calculate_loan_repayments(Money::MAX_INPUT, Rate::from_percent(dec!(100)), 50).is_ok());
    }

    #[test]
    fn test_principal_above_input_limit_rejected() {
        let too_big = Money::MAX_INPUT + Money::from_major(1);
        let err = calculate_loan_repayments(too_big, Rate::from_percent(dec!(6)), 30).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { ref field, .. } if field == "loan_amount"));
    }

    #[test]
    fn test_lvr() {
        let lvr = calculate_lvr(Money::from_major(600_000), Money::from_major(750_000)).unwrap();
        assert_eq!(lvr.lvr, dec!(80));
        assert!(!lvr.requires_lmi);
        assert_eq!(lvr.deposit, Money::from_major(150_000));
        assert_eq!(lvr.deposit_percentage, dec!(20));

        let high = calculate_lvr(Money::from_major(680_000), Money::from_major(750_000)).unwrap();
        assert_eq!(high.lvr, dec!(90.67));
        assert!(high.requires_lmi);
    }

    #[test]
    fn test_lvr_rejects_zero_property_value() {
        assert!(calculate_lvr(Money::from_major(1), Money::ZERO).is_err());
    }

    #[test]
    fn test_lvr_ratio_too_large_is_error() {
        let loan = Money::from_decimal(dec!(10000000000000000000000000));
        let err = calculate_lvr(loan, Money::from_minor(1)).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { .. }));
    }

    proptest! {
        #[test]
        fn prop_zero_rate_divides_evenly(principal in 1i64..5_000_000, term in 1u32..=50) {
            let principal = Money::from_major(principal);
            let result = calculate_loan_repayments(principal, Rate::ZERO, term).unwrap();
            let expected = (principal / Decimal::from(term * 12)).round_cents();
            prop_assert_eq!(result.monthly_repayment, expected);
        }
    }
}
