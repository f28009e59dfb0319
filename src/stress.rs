use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cashflow::calculate_cash_flow;
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::expenses::AnnualExpenses;
use crate::loan::calculate_loan_repayments;

/// repayments and cash flow if the rate rose by `rate_increase` points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub rate_increase: Decimal,
    pub new_rate_percent: Decimal,
    pub monthly_repayment: Money,
    pub annual_repayment: Money,
    pub annual_cash_flow: Money,
    pub is_positive: bool,
}

pub fn stress_test(
    loan_amount: Money,
    annual_rate: Rate,
    term_years: u32,
    annual_rent: Money,
    annual_expenses: &AnnualExpenses,
    rate_increase: Decimal,
) -> Result<StressTestResult> {
    let stressed = annual_rate + Rate::from_percent(rate_increase);
    let repayments = calculate_loan_repayments(loan_amount, stressed, term_years)?;
    let cash_flow = calculate_cash_flow(annual_rent, repayments.annual_repayment, annual_expenses);

    Ok(StressTestResult {
        rate_increase,
        new_rate_percent: stressed.as_percentage().normalize(),
        monthly_repayment: repayments.monthly_repayment,
        annual_repayment: repayments.annual_repayment,
        annual_cash_flow: cash_flow.cash_flow.annual,
        is_positive: cash_flow.is_positive,
    })
}

/// run `stress_test` for each increase, in order. increases that would take
/// the rate above 100% are skipped
pub fn stress_tests(
    loan_amount: Money,
    annual_rate: Rate,
    term_years: u32,
    annual_rent: Money,
    annual_expenses: &AnnualExpenses,
    rate_increases: &[Decimal],
) -> Result<Vec<StressTestResult>> {
    rate_increases
        .iter()
        .filter(|increase| (annual_rate + Rate::from_percent(**increase)).as_percentage() <= dec!(100))
        .map(|increase| {
            stress_test(
                loan_amount,
                annual_rate,
                term_years,
                annual_rent,
                annual_expenses,
                *increase,
            )
        })
        .collect()
}
