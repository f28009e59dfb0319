use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::loan::repayment::{monthly_instalment, validate_loan_terms};

/// balance snapshot at the start of a year of the loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationScheduleEntry {
    pub year: u32,
    pub remaining_balance: Money,
    pub cumulative_principal_paid: Money,
    pub cumulative_interest_paid: Money,
    pub equity_built: Money,
}

/// yearly amortization schedule
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    pub interval_years: u32,
    pub entries: Vec<AmortizationScheduleEntry>,
}

impl AmortizationSchedule {
    /// simulate month by month, emitting a snapshot at year 0, every
    /// `interval_years`, and at the final year
    pub fn generate(
        principal: Money,
        annual_rate: Rate,
        term_years: u32,
        interval_years: u32,
    ) -> Result<Self> {
        validate_loan_terms(principal, annual_rate, term_years)?;
        if interval_years == 0 {
            return Err(CalculatorError::invalid(
                "interval",
                "schedule interval must be at least 1 year",
            ));
        }

        let monthly_rate = annual_rate.monthly_rate().as_decimal();
        let instalment = monthly_instalment(principal, annual_rate, term_years)?;

        let mut entries = Vec::new();
        let mut balance = principal;
        let mut principal_paid = Money::ZERO;
        let mut interest_paid = Money::ZERO;

        for year in 0..=term_years {
            if year % interval_years == 0 || year == term_years {
                entries.push(AmortizationScheduleEntry {
                    year,
                    remaining_balance: balance.round_cents(),
                    cumulative_principal_paid: principal_paid.round_cents(),
                    cumulative_interest_paid: interest_paid.round_cents(),
                    equity_built: (principal - balance).round_cents(),
                });
            }

            if year == term_years {
                break;
            }

            for _ in 0..12 {
                if !balance.is_positive() {
                    break;
                }
                let interest = balance * monthly_rate;
                let principal_portion = instalment - interest;

                balance -= principal_portion;
                principal_paid += principal_portion;
                interest_paid += interest;

                // absorb rounding drift on the final instalment
                balance = balance.max(Money::ZERO);
            }
        }

        Ok(Self {
            principal,
            annual_rate,
            term_years,
            interval_years,
            entries,
        })
    }

    /// snapshot recorded for `year`, if the interval produced one
    pub fn entry_for_year(&self, year: u32) -> Option<&AmortizationScheduleEntry> {
        self.entries.iter().find(|e| e.year == year)
    }

    /// remaining balance at the start of `year`; zero once the term has run out
    pub fn balance_at_year(&self, year: u32) -> Money {
        if year >= self.term_years {
            return Money::ZERO;
        }
        self.entry_for_year(year)
            .or_else(|| self.entries.last())
            .map(|e| e.remaining_balance)
            .unwrap_or(Money::ZERO)
    }
}

/// generate loan amortization schedule at the given yearly interval
pub fn generate_amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    term_years: u32,
    interval_years: u32,
) -> Result<Vec<AmortizationScheduleEntry>> {
    AmortizationSchedule::generate(principal, annual_rate, term_years, interval_years)
        .map(|schedule| schedule.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yearly_schedule_shape() {
        let schedule = generate_amortization_schedule(
            Money::from_major(500_000),
            Rate::from_percent(dec!(6)),
            30,
            1,
        )
        .unwrap();

        assert_eq!(schedule.len(), 31);
        assert_eq!(schedule[0].year, 0);
        assert_eq!(schedule[0].remaining_balance, Money::from_major(500_000));
        assert_eq!(schedule[0].cumulative_interest_paid, Money::ZERO);
        assert!(schedule[30].remaining_balance < Money::from_major(1));

        for pair in schedule.windows(2) {
            assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
            assert!(pair[1].year > pair[0].year);
        }

        // interest dominates early repayments
        let first_year = &schedule[1];
        assert!(first_year.cumulative_interest_paid > first_year.cumulative_principal_paid);
        assert_eq!(first_year.equity_built, first_year.cumulative_principal_paid);
    }

    #[test]
    fn test_interval_always_includes_final_year() {
        let schedule = generate_amortization_schedule(
            Money::from_major(300_000),
            Rate::from_percent(dec!(5.5)),
            12,
            5,
        )
        .unwrap();

        let years: Vec<u32> = schedule.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![0, 5, 10, 12]);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = generate_amortization_schedule(Money::from_major(1_000), Rate::ZERO, 5, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_balance_lookup_after_term() {
        let schedule = AmortizationSchedule::generate(
            Money::from_major(100_000),
            Rate::from_percent(dec!(4)),
            10,
            1,
        )
        .unwrap();

        assert_eq!(schedule.balance_at_year(0), Money::from_major(100_000));
        assert!(schedule.balance_at_year(5) < Money::from_major(100_000));
        assert_eq!(schedule.balance_at_year(10), Money::ZERO);
        assert_eq!(schedule.balance_at_year(25), Money::ZERO);
    }

    proptest! {
        #[test]
        fn prop_schedule_starts_at_principal_and_ends_near_zero(
            principal in 10_000i64..2_000_000,
            rate_bps in 1u32..1_500,
            term in 1u32..=40,
        ) {
            let principal = Money::from_major(principal);
            let rate = Rate::from_bps(rate_bps);
            let schedule = generate_amortization_schedule(principal, rate, term, 1).unwrap();

            prop_assert_eq!(schedule[0].remaining_balance, principal);
            let last = schedule.last().unwrap();
            prop_assert_eq!(last.year, term);
            prop_assert!(last.remaining_balance.as_decimal() <= Decimal::ONE);
        }
    }
}
