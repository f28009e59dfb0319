use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{round_half_up, Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::loan::{monthly_instalment, validate_loan_terms};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearByYearParams {
    pub purchase_price: Money,
    pub loan_amount: Money,
    pub annual_rate: Rate,
    pub loan_term_years: u32,
    pub initial_monthly_rent: Money,
    pub monthly_expenses: Money,
    pub capital_growth: Rate,
    pub rental_growth: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearByYearEntry {
    pub year: u32,
    pub property_value: Money,
    pub loan_balance: Money,
    pub equity: Money,
    pub equity_percentage: Decimal,
    pub monthly_rent: Money,
    pub annual_rent: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub is_self_sufficient: bool,
}

/// first year the property pays for itself, if any within the term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelfSufficientYear(pub Option<u32>);

impl SelfSufficientYear {
    pub fn year(&self) -> Option<u32> {
        self.0
    }

    pub fn is_never(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for SelfSufficientYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(year) => write!(f, "{}", year),
            None => f.write_str("Never"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearByYearSummary {
    pub total_years: u32,
    pub final_property_value: Money,
    pub final_equity: Money,
    pub final_monthly_rent: Money,
    pub self_sufficient_year: SelfSufficientYear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearByYearResult {
    pub yearly_data: Vec<YearByYearEntry>,
    pub self_sufficient_year: SelfSufficientYear,
    pub summary: YearByYearSummary,
}

/// monthly simulation over the loan term, finding the first year rent covers
/// repayments and expenses.
///
/// property value and rent grow at the *end* of each year, so a year's income
/// uses the rent in force at the start of that year while its equity uses the
/// grown property value. expenses are held flat and the instalment is charged
/// for every year of the term. figures will not match the long-range
/// projection for the same inputs.
pub fn calculate_year_by_year(params: &YearByYearParams) -> Result<YearByYearResult> {
    validate_loan_terms(params.loan_amount, params.annual_rate, params.loan_term_years)?;

    let monthly_rate = params.annual_rate.monthly_rate().as_decimal();
    let instalment = monthly_instalment(params.loan_amount, params.annual_rate, params.loan_term_years)?;
    let capital_factor = Decimal::ONE + params.capital_growth.as_decimal();
    let rental_factor = Decimal::ONE + params.rental_growth.as_decimal();

    let annual_expenses = params.monthly_expenses * dec!(12);
    let annual_loan_payment = instalment * dec!(12);

    let mut balance = params.loan_amount;
    let mut property_value = params.purchase_price;
    let mut monthly_rent = params.initial_monthly_rent;
    let mut self_sufficient_year = None;
    let mut yearly_data = Vec::with_capacity(params.loan_term_years as usize);

    for year in 1..=params.loan_term_years {
        let start_of_year_rent = monthly_rent;
        let mut principal_paid = Money::ZERO;
        let mut interest_paid = Money::ZERO;

        for _ in 0..12 {
            if !balance.is_positive() {
                break;
            }
            let interest = balance * monthly_rate;
            let principal = instalment - interest;

            interest_paid += interest;
            principal_paid += principal;
            balance = (balance - principal).max(Money::ZERO);
        }

        // growth lands at year end
        property_value = property_value
            .checked_mul(capital_factor)
            .ok_or_else(|| CalculatorError::too_large("capital_growth"))?;
        monthly_rent = monthly_rent
            .checked_mul(rental_factor)
            .ok_or_else(|| CalculatorError::too_large("rental_growth"))?;

        let equity = property_value - balance;
        let equity_percentage = equity
            .percent_of(property_value)
            .map(|p| round_half_up(p, 2))
            .unwrap_or(Decimal::ZERO);

        let annual_rent = start_of_year_rent
            .checked_mul(dec!(12))
            .ok_or_else(|| CalculatorError::too_large("rental_growth"))?;
        let annual_cash_flow = annual_rent - annual_expenses - annual_loan_payment;
        let is_self_sufficient = !annual_cash_flow.is_negative();

        if is_self_sufficient && self_sufficient_year.is_none() {
            self_sufficient_year = Some(year);
        }

        yearly_data.push(YearByYearEntry {
            year,
            property_value: property_value.round_whole(),
            loan_balance: balance.round_whole(),
            equity: equity.round_whole(),
            equity_percentage,
            monthly_rent: start_of_year_rent.round_whole(),
            annual_rent: annual_rent.round_whole(),
            principal_paid: principal_paid.round_whole(),
            interest_paid: interest_paid.round_whole(),
            monthly_cash_flow: (annual_cash_flow / dec!(12)).round_whole(),
            annual_cash_flow: annual_cash_flow.round_whole(),
            is_self_sufficient,
        });
    }

    let self_sufficient_year = SelfSufficientYear(self_sufficient_year);

    Ok(YearByYearResult {
        yearly_data,
        self_sufficient_year,
        summary: YearByYearSummary {
            total_years: params.loan_term_years,
            final_property_value: property_value.round_whole(),
            final_equity: (property_value - balance).round_whole(),
            final_monthly_rent: monthly_rent.round_whole(),
            self_sufficient_year,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> YearByYearParams {
        YearByYearParams {
            purchase_price: Money::from_major(600_000),
            loan_amount: Money::from_major(480_000),
            annual_rate: Rate::from_percent(dec!(6)),
            loan_term_years: 30,
            initial_monthly_rent: Money::from_major(2_400),
            monthly_expenses: Money::from_major(500),
            capital_growth: Rate::from_percent(dec!(5)),
            rental_growth: Rate::from_percent(dec!(4)),
        }
    }

    #[test]
    fn test_rent_uses_start_of_year_value() {
        let result = calculate_year_by_year(&params()).unwrap();
        let first = &result.yearly_data[0];
        let second = &result.yearly_data[1];

        assert_eq!(first.year, 1);
        assert_eq!(first.monthly_rent, Money::from_major(2_400));
        assert_eq!(first.annual_rent, Money::from_major(28_800));
        // property value already grown for year 1
        assert_eq!(first.property_value, Money::from_major(630_000));
        assert_eq!(second.monthly_rent, Money::from_major(2_496));
    }

    #[test]
    fn test_self_sufficient_year_is_first_crossing() {
        let result = calculate_year_by_year(&params()).unwrap();
        let year = result.self_sufficient_year.year().expect("rent should overtake costs");

        for entry in &result.yearly_data {
            if entry.year < year {
                assert!(!entry.is_self_sufficient);
                assert!(entry.annual_cash_flow.is_negative());
            }
        }
        let crossing = &result.yearly_data[(year - 1) as usize];
        assert!(crossing.is_self_sufficient);
        assert_eq!(result.summary.self_sufficient_year, result.self_sufficient_year);
    }

    #[test]
    fn test_never_self_sufficient() {
        let result = calculate_year_by_year(&YearByYearParams {
            rental_growth: Rate::ZERO,
            ..params()
        })
        .unwrap();

        assert!(result.self_sufficient_year.is_never());
        assert_eq!(result.self_sufficient_year.to_string(), "Never");
        assert_eq!(result.yearly_data.len(), 30);
    }

    #[test]
    fn test_loan_repaid_by_end_of_term() {
        let result = calculate_year_by_year(&params()).unwrap();
        let last = result.yearly_data.last().unwrap();
        assert_eq!(last.loan_balance, Money::ZERO);
        assert_eq!(last.equity, last.property_value);
        assert_eq!(result.summary.final_equity, result.summary.final_property_value);
    }

    #[test]
    fn test_zero_rate_uses_simple_division() {
        let result = calculate_year_by_year(&YearByYearParams {
            annual_rate: Rate::ZERO,
            loan_term_years: 10,
            ..params()
        })
        .unwrap();

        let first = &result.yearly_data[0];
        assert_eq!(first.interest_paid, Money::ZERO);
        assert_eq!(first.principal_paid, Money::from_major(48_000));
    }

    #[test]
    fn test_extreme_rate_and_growth_stay_finite() {
        let result = calculate_year_by_year(&YearByYearParams {
            purchase_price: Money::from_major(2_500_000_000),
            loan_amount: Money::from_major(2_000_000_000),
            annual_rate: Rate::from_percent(dec!(100)),
            loan_term_years: 50,
            capital_growth: Rate::from_percent(dec!(100)),
            rental_growth: Rate::from_percent(dec!(100)),
            ..params()
        })
        .unwrap();

        assert_eq!(result.yearly_data.len(), 50);
        assert_eq!(result.yearly_data[0].property_value, Money::from_major(5_000_000_000));
    }

    #[test]
    fn test_growth_beyond_decimal_range_is_error() {
        let err = calculate_year_by_year(&YearByYearParams {
            purchase_price: Money::MAX_INPUT,
            loan_term_years: 50,
            capital_growth: Rate::from_percent(dec!(100)),
            ..params()
        })
        .unwrap_err();

        assert!(matches!(err, CalculatorError::InvalidInput { ref field, .. } if field == "capital_growth"));
    }

    #[test]
    fn test_serializes_never_as_null() {
        let json = serde_json::to_value(SelfSufficientYear(None)).unwrap();
        assert!(json.is_null());
        let json = serde_json::to_value(SelfSufficientYear(Some(7))).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }
}
