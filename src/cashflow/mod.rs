pub mod yields;

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::expenses::{total_expenses, AnnualExpenses};

pub use yields::{calculate_net_rental_yield, calculate_rental_yield, NetRentalYield, RentalYield};

/// a figure reported per year, month and week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicAmount {
    pub annual: Money,
    pub monthly: Money,
    pub weekly: Money,
}

impl PeriodicAmount {
    /// split an annual figure, each period rounded to cents
    pub fn from_annual(annual: Money) -> Self {
        Self {
            annual: annual.round_cents(),
            monthly: (annual / dec!(12)).round_cents(),
            weekly: (annual / dec!(52)).round_cents(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub loan_repayment: Money,
    pub expenses: Money,
    pub total: Money,
    pub breakdown: AnnualExpenses,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowResult {
    pub income: PeriodicAmount,
    pub costs: CostBreakdown,
    pub cash_flow: PeriodicAmount,
    pub is_positive: bool,
}

/// aggregate rent, loan cost and itemized expenses into net cash flow.
///
/// the reported annual net is taken from the rounded income and cost totals
/// so that `income.annual - costs.total == cash_flow.annual` holds exactly,
/// and `is_positive` is read from that same reported figure.
pub fn calculate_cash_flow(
    annual_income: Money,
    annual_loan_repayment: Money,
    annual_expenses: &AnnualExpenses,
) -> CashFlowResult {
    let expenses = total_expenses(annual_expenses);
    let total_costs = annual_loan_repayment + expenses;

    let income = PeriodicAmount::from_annual(annual_income);
    let total = total_costs.round_cents();
    let net = annual_income - total_costs;

    let cash_flow = PeriodicAmount {
        annual: income.annual - total,
        ..PeriodicAmount::from_annual(net)
    };

    CashFlowResult {
        income,
        costs: CostBreakdown {
            loan_repayment: annual_loan_repayment.round_cents(),
            expenses: expenses.round_cents(),
            total,
            breakdown: annual_expenses
                .iter()
                .map(|(category, amount)| (*category, amount.round_cents()))
                .collect(),
        },
        cash_flow,
        is_positive: !cash_flow.annual.is_negative(),
    }
}
