use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decimal::Money;
use crate::types::{ExpenseCategory, ExpenseFrequency};

/// a recurring holding cost as billed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicExpense {
    pub category: ExpenseCategory,
    pub amount: Money,
    pub frequency: ExpenseFrequency,
}

impl PeriodicExpense {
    pub fn new(category: ExpenseCategory, amount: Money, frequency: ExpenseFrequency) -> Self {
        Self {
            category,
            amount,
            frequency,
        }
    }

    pub fn yearly(category: ExpenseCategory, amount: Money) -> Self {
        Self::new(category, amount, ExpenseFrequency::Yearly)
    }

    /// billed amount over a year
    pub fn annual(&self) -> Money {
        self.amount * Decimal::from(self.frequency.periods_per_year())
    }
}

/// annual expenses keyed by category
pub type AnnualExpenses = BTreeMap<ExpenseCategory, Money>;

/// annualize billed expenses and add property management as a share of rent.
/// repeated categories are summed
pub fn annualize_expenses(
    expenses: &[PeriodicExpense],
    annual_rent: Money,
    management_fee_percent: Decimal,
) -> AnnualExpenses {
    let mut annual = AnnualExpenses::new();
    annual.insert(
        ExpenseCategory::PropertyManagement,
        annual_rent.percentage(management_fee_percent),
    );

    for expense in expenses {
        *annual.entry(expense.category).or_insert(Money::ZERO) += expense.annual();
    }

    annual
}

pub fn total_expenses(expenses: &AnnualExpenses) -> Money {
    expenses.values().sum()
}

/// annual total spread evenly over twelve months
pub fn monthly_total(expenses: &AnnualExpenses) -> Money {
    total_expenses(expenses) / dec!(12)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_normalization() {
        let strata = PeriodicExpense::new(
            ExpenseCategory::Strata,
            Money::from_major(900),
            ExpenseFrequency::Quarterly,
        );
        assert_eq!(strata.annual(), Money::from_major(3_600));

        let fee = PeriodicExpense::new(
            ExpenseCategory::WealthFee,
            Money::from_major(10),
            ExpenseFrequency::Weekly,
        );
        assert_eq!(fee.annual(), Money::from_major(520));

        let water = PeriodicExpense::new(
            ExpenseCategory::WaterRates,
            Money::from_major(150),
            ExpenseFrequency::HalfYearly,
        );
        assert_eq!(water.annual(), Money::from_major(300));
    }

    #[test]
    fn test_annualize_with_management_fee() {
        let expenses = vec![
            PeriodicExpense::yearly(ExpenseCategory::CouncilRates, Money::from_major(2_000)),
            PeriodicExpense::yearly(ExpenseCategory::Insurance, Money::from_major(1_200)),
            PeriodicExpense::new(
                ExpenseCategory::Insurance,
                Money::from_major(50),
                ExpenseFrequency::Monthly,
            ),
        ];

        let annual = annualize_expenses(&expenses, Money::from_major(26_000), dec!(8));

        assert_eq!(annual[&ExpenseCategory::PropertyManagement], Money::from_major(2_080));
        assert_eq!(annual[&ExpenseCategory::Insurance], Money::from_major(1_800));
        assert_eq!(total_expenses(&annual), Money::from_major(5_880));
        assert_eq!(monthly_total(&annual), Money::from_major(490));
    }
}
