use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money};
use crate::errors::{CalculatorError, Result};
use crate::expenses::{total_expenses, AnnualExpenses};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalYield {
    pub gross_yield: Decimal,
    pub annual_rent: Money,
    pub property_value: Money,
}

/// yield after expenses, before loan repayments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRentalYield {
    pub net_yield: Decimal,
    pub net_income: Money,
    pub total_expenses: Money,
    pub property_value: Money,
}

fn require_positive_value(property_value: Money) -> Result<()> {
    if !property_value.is_positive() {
        return Err(CalculatorError::invalid(
            "property_value",
            "property value must be greater than 0",
        ));
    }
    Ok(())
}

pub fn calculate_rental_yield(annual_rent: Money, property_value: Money) -> Result<RentalYield> {
    require_positive_value(property_value)?;

    let gross = annual_rent
        .percent_of(property_value)
        .ok_or_else(|| CalculatorError::too_large("annual_rent"))?;

    Ok(RentalYield {
        gross_yield: round_half_up(gross, 2),
        annual_rent: annual_rent.round_cents(),
        property_value: property_value.round_cents(),
    })
}

pub fn calculate_net_rental_yield(
    annual_rent: Money,
    property_value: Money,
    annual_expenses: &AnnualExpenses,
) -> Result<NetRentalYield> {
    require_positive_value(property_value)?;

    let expenses = total_expenses(annual_expenses);
    let net_income = annual_rent - expenses;
    let net = net_income
        .percent_of(property_value)
        .ok_or_else(|| CalculatorError::too_large("annual_rent"))?;

    Ok(NetRentalYield {
        net_yield: round_half_up(net, 2),
        net_income: net_income.round_cents(),
        total_expenses: expenses.round_cents(),
        property_value: property_value.round_cents(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExpenseCategory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_gross_yield() {
        let y = calculate_rental_yield(Money::from_major(26_000), Money::from_major(650_000)).unwrap();
        assert_eq!(y.gross_yield, dec!(4));
    }

    #[test]
    fn test_zero_rent_gives_zero_yield() {
        let y = calculate_rental_yield(Money::ZERO, Money::from_major(500_000)).unwrap();
        assert_eq!(y.gross_yield, Decimal::ZERO);
    }

    #[test]
    fn test_net_yield() {
        let mut expenses = AnnualExpenses::new();
        expenses.insert(ExpenseCategory::CouncilRates, Money::from_major(2_000));
        expenses.insert(ExpenseCategory::Insurance, Money::from_major(1_500));

        let y = calculate_net_rental_yield(Money::from_major(30_000), Money::from_major(600_000), &expenses)
            .unwrap();
        assert_eq!(y.net_income, Money::from_major(26_500));
        assert_eq!(y.net_yield, dec!(4.42));
    }

    #[test]
    fn test_yield_beyond_decimal_range_is_error() {
        let rent = Money::from_decimal(dec!(10000000000000000000000000));
        let err = calculate_rental_yield(rent, Money::from_minor(1)).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { ref field, .. } if field == "annual_rent"));
        assert!(calculate_net_rental_yield(rent, Money::from_minor(1), &AnnualExpenses::new()).is_err());
    }

    #[test]
    fn test_non_positive_value_rejected() {
        assert!(calculate_rental_yield(Money::from_major(1), Money::ZERO).is_err());
        assert!(calculate_net_rental_yield(Money::from_major(1), Money::from_major(-1), &AnnualExpenses::new()).is_err());
    }
}
