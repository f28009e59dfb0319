pub mod metrics;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::loan::AmortizationSchedule;

pub use metrics::{
    calculate_investment_metrics, InvestmentMetrics, MilestoneSnapshot, Milestones, ReturnMeasure,
};

/// expense inflation is a fixed simplifying assumption, not a caller setting
pub const EXPENSE_INFLATION_PERCENT: Decimal = dec!(2.5);

pub const DEFAULT_PROJECTION_YEARS: u32 = 30;

/// loan terms the projection overlays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionLoan {
    pub loan_amount: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    pub annual_repayment: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub purchase_price: Money,
    pub annual_rent: Money,
    pub loan: ProjectionLoan,
    pub total_annual_expenses: Money,
    pub capital_growth: Rate,
    pub rental_growth: Rate,
    pub years: u32,
}

/// one year of the projection, whole dollars except equity percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntry {
    pub year: u32,
    pub property_value: Money,
    pub equity: Money,
    pub equity_percentage: Decimal,
    pub remaining_loan_balance: Money,
    pub annual_rent: Money,
    pub annual_expenses: Money,
    pub annual_loan_repayment: Money,
    pub annual_cash_flow: Money,
    pub cumulative_cash_flow: Money,
    pub cumulative_rent: Money,
    pub cumulative_expenses: Money,
    pub cumulative_loan_repayments: Money,
    pub net_worth: Money,
}

#[derive(Default)]
struct RunningTotals {
    cash_flow: Money,
    rent: Money,
    expenses: Money,
    loan_repayments: Money,
}

impl RunningTotals {
    fn record(
        &mut self,
        cash_flow: Money,
        rent: Money,
        expenses: Money,
        repayment: Money,
    ) -> Result<()> {
        let add = |total: Money, amount: Money| {
            total
                .checked_add(amount)
                .ok_or_else(|| CalculatorError::too_large("years"))
        };
        self.cash_flow = add(self.cash_flow, cash_flow)?;
        self.rent = add(self.rent, rent)?;
        self.expenses = add(self.expenses, expenses)?;
        self.loan_repayments = add(self.loan_repayments, repayment)?;
        Ok(())
    }
}

/// long-range projection over years 0..=params.years.
///
/// property value and rent compound once a year from year 0 and expenses
/// inflate at a fixed 2.5% a year. the loan balance for each year is read from
/// the yearly amortization schedule and drops to zero once the term is over.
/// year 0 is a baseline snapshot and is not counted in the running totals.
pub fn calculate_projection(params: &ProjectionParams) -> Result<Vec<ProjectionEntry>> {
    let schedule = AmortizationSchedule::generate(
        params.loan.loan_amount,
        params.loan.annual_rate,
        params.loan.term_years,
        1,
    )?;
    let expense_inflation = Rate::from_percent(EXPENSE_INFLATION_PERCENT);

    let mut totals = RunningTotals::default();
    let mut projection = Vec::with_capacity(params.years as usize + 1);

    for year in 0..=params.years {
        let property_value = params
            .purchase_price
            .compound(params.capital_growth, year)
            .ok_or_else(|| CalculatorError::too_large("capital_growth"))?;
        let rent = params
            .annual_rent
            .compound(params.rental_growth, year)
            .ok_or_else(|| CalculatorError::too_large("rental_growth"))?;
        let expenses = params
            .total_annual_expenses
            .compound(expense_inflation, year)
            .ok_or_else(|| CalculatorError::too_large("expenses"))?;

        let in_term = year < params.loan.term_years;
        let balance = schedule.balance_at_year(year);
        let repayment = if in_term {
            params.loan.annual_repayment
        } else {
            Money::ZERO
        };

        let equity = property_value - balance;
        let cash_flow = rent - repayment - expenses;

        if year > 0 {
            totals.record(cash_flow, rent, expenses, repayment)?;
        }
        let net_worth = equity
            .checked_add(totals.cash_flow)
            .ok_or_else(|| CalculatorError::too_large("years"))?;

        let equity_percentage = equity
            .percent_of(property_value)
            .map(|p| round_half_up(p, 1))
            .unwrap_or(Decimal::ZERO);

        projection.push(ProjectionEntry {
            year,
            property_value: property_value.round_whole(),
            equity: equity.round_whole(),
            equity_percentage,
            remaining_loan_balance: balance.round_whole(),
            annual_rent: rent.round_whole(),
            annual_expenses: expenses.round_whole(),
            annual_loan_repayment: repayment.round_whole(),
            annual_cash_flow: cash_flow.round_whole(),
            cumulative_cash_flow: totals.cash_flow.round_whole(),
            cumulative_rent: totals.rent.round_whole(),
            cumulative_expenses: totals.expenses.round_whole(),
            cumulative_loan_repayments: totals.loan_repayments.round_whole(),
            net_worth: net_worth.round_whole(),
        });
    }

    Ok(projection)
}

/// the standard 30-year projection
pub fn calculate_30_year_projection(params: &ProjectionParams) -> Result<Vec<ProjectionEntry>> {
    calculate_projection(&ProjectionParams {
        years: DEFAULT_PROJECTION_YEARS,
        ..params.clone()
    })
}
