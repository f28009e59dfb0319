use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money};
use crate::errors::{CalculatorError, Result};
use crate::projection::ProjectionEntry;

/// a percentage return that may not be defined for the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnMeasure {
    Defined(Decimal),
    /// zero or negative investment or net worth, or no elapsed years
    Undefined,
}

impl ReturnMeasure {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            ReturnMeasure::Defined(v) => Some(*v),
            ReturnMeasure::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSnapshot {
    pub year: u32,
    pub net_worth: Money,
    pub equity: Money,
    pub property_value: Money,
    pub cumulative_cash_flow: Money,
}

impl From<&ProjectionEntry> for MilestoneSnapshot {
    fn from(entry: &ProjectionEntry) -> Self {
        Self {
            year: entry.year,
            net_worth: entry.net_worth,
            equity: entry.equity,
            property_value: entry.property_value,
            cumulative_cash_flow: entry.cumulative_cash_flow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestones {
    pub year10: MilestoneSnapshot,
    pub year20: MilestoneSnapshot,
    pub year30: MilestoneSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    pub initial_investment: Money,
    pub final_net_worth: Money,
    pub total_return: Money,
    pub return_on_investment: ReturnMeasure,
    /// compound annual growth rate of net worth over the projection
    pub average_annual_return: ReturnMeasure,
    pub milestones: Milestones,
    pub total_rent_received: Money,
    pub total_expenses_paid: Money,
    pub total_loan_repayments: Money,
}

/// derive return figures from a projection and the cash put in up front
pub fn calculate_investment_metrics(
    projection: &[ProjectionEntry],
    initial_investment: Money,
) -> Result<InvestmentMetrics> {
    let final_year = projection.last().ok_or_else(|| {
        CalculatorError::invalid("projection", "projection data is required")
    })?;
    let year10 = projection.get(10).unwrap_or(final_year);
    let year20 = projection.get(20).unwrap_or(final_year);

    let final_net_worth = final_year.net_worth;
    let total_return = final_net_worth - initial_investment;
    let years = (projection.len() - 1) as u32;

    let return_on_investment = match total_return.percent_of(initial_investment) {
        Some(roi) if initial_investment.is_positive() => ReturnMeasure::Defined(round_half_up(roi, 1)),
        _ => ReturnMeasure::Undefined,
    };

    Ok(InvestmentMetrics {
        initial_investment: initial_investment.round_whole(),
        final_net_worth,
        total_return: total_return.round_whole(),
        return_on_investment,
        average_annual_return: compound_annual_growth(initial_investment, final_net_worth, years),
        milestones: Milestones {
            year10: year10.into(),
            year20: year20.into(),
            year30: final_year.into(),
        },
        total_rent_received: final_year.cumulative_rent,
        total_expenses_paid: final_year.cumulative_expenses,
        total_loan_repayments: final_year.cumulative_loan_repayments,
    })
}

/// ((end / start)^(1/years) - 1) x 100, undefined unless both ends are positive
pub fn compound_annual_growth(start: Money, end: Money, years: u32) -> ReturnMeasure {
    if years == 0 || !start.is_positive() || !end.is_positive() {
        return ReturnMeasure::Undefined;
    }

    let exponent = Decimal::ONE / Decimal::from(years);

    end.as_decimal()
        .checked_div(start.as_decimal())
        .and_then(|ratio| ratio.checked_powd(exponent))
        .and_then(|growth| (growth - Decimal::ONE).checked_mul(dec!(100)))
        .map(|cagr| ReturnMeasure::Defined(round_half_up(cagr, 1)))
        .unwrap_or(ReturnMeasure::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(year: u32, net_worth: i64) -> ProjectionEntry {
        ProjectionEntry {
            year,
            property_value: Money::from_major(net_worth),
            equity: Money::from_major(net_worth),
            equity_percentage: dec!(100),
            remaining_loan_balance: Money::ZERO,
            annual_rent: Money::ZERO,
            annual_expenses: Money::ZERO,
            annual_loan_repayment: Money::ZERO,
            annual_cash_flow: Money::ZERO,
            cumulative_cash_flow: Money::ZERO,
            cumulative_rent: Money::from_major(year as i64 * 1_000),
            cumulative_expenses: Money::from_major(year as i64 * 100),
            cumulative_loan_repayments: Money::ZERO,
            net_worth: Money::from_major(net_worth),
        }
    }

    fn doubling_projection(years: u32) -> Vec<ProjectionEntry> {
        (0..=years).map(|y| entry(y, 100_000 * 2_i64.pow(y / 10))).collect()
    }

    #[test]
    fn test_empty_projection_rejected() {
        let err = calculate_investment_metrics(&[], Money::from_major(1)).unwrap_err();
        assert!(matches!(err, CalculatorError::InvalidInput { .. }));
    }

    #[test]
    fn test_metrics_from_projection() {
        let projection = doubling_projection(30);
        let metrics = calculate_investment_metrics(&projection, Money::from_major(100_000)).unwrap();

        assert_eq!(metrics.final_net_worth, Money::from_major(800_000));
        assert_eq!(metrics.total_return, Money::from_major(700_000));
        assert_eq!(metrics.return_on_investment, ReturnMeasure::Defined(dec!(700)));
        // 8x over 30 years is 2x per decade
        assert_eq!(metrics.average_annual_return, ReturnMeasure::Defined(dec!(7.2)));
        assert_eq!(metrics.milestones.year10.net_worth, Money::from_major(200_000));
        assert_eq!(metrics.milestones.year20.net_worth, Money::from_major(400_000));
        assert_eq!(metrics.milestones.year30.year, 30);
        assert_eq!(metrics.total_rent_received, Money::from_major(30_000));
        assert_eq!(metrics.total_expenses_paid, Money::from_major(3_000));
    }

    #[test]
    fn test_short_projection_clamps_milestones() {
        let projection = doubling_projection(5);
        let metrics = calculate_investment_metrics(&projection, Money::from_major(100_000)).unwrap();
        assert_eq!(metrics.milestones.year10.year, 5);
        assert_eq!(metrics.milestones.year20.year, 5);
    }

    #[test]
    fn test_undefined_growth() {
        let projection = vec![entry(0, 100_000), entry(1, -50_000)];
        let metrics = calculate_investment_metrics(&projection, Money::from_major(100_000)).unwrap();
        assert_eq!(metrics.average_annual_return, ReturnMeasure::Undefined);
        assert_eq!(metrics.return_on_investment, ReturnMeasure::Defined(dec!(-150)));

        let metrics = calculate_investment_metrics(&projection[..1], Money::ZERO).unwrap();
        assert_eq!(metrics.return_on_investment, ReturnMeasure::Undefined);
        assert_eq!(metrics.average_annual_return, ReturnMeasure::Undefined);
        assert_eq!(metrics.average_annual_return.value(), None);
    }

    #[test]
    fn test_growth_ratio_out_of_range_is_undefined() {
        let start = Money::from_minor(1);
        let end = Money::from_decimal(dec!(70000000000000000000000000000));
        assert_eq!(compound_annual_growth(start, end, 1), ReturnMeasure::Undefined);
        assert_eq!(
            compound_annual_growth(Money::from_major(100), Money::from_major(400), 2),
            ReturnMeasure::Defined(dec!(100))
        );
    }

    #[test]
    fn test_final_net_worth_reproduced() {
        let projection = doubling_projection(30);
        let initial = Money::from_major(123_456);
        let metrics = calculate_investment_metrics(&projection, initial).unwrap();
        assert_eq!(metrics.total_return + initial, metrics.final_net_worth);
    }
}
