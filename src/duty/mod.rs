use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{DutySchedule, DutyTables, JurisdictionDuty};
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::{ConcessionKind, Jurisdiction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampDutyResult {
    pub jurisdiction: Jurisdiction,
    pub property_value: Money,
    pub is_first_home_buyer: bool,
    pub total: Money,
    pub concession_applied: bool,
    pub concession_kind: ConcessionKind,
    pub amount_saved: Money,
}

/// transfer duty calculator over a borrowed set of tables.
///
/// first home buyer concessions are evaluated before the standard schedule:
///
/// 1. value at or below the full exemption ceiling: no duty payable
/// 2. value at or below the partial concession ceiling: full duty reduced by a
///    linear taper between the two ceilings
/// 3. otherwise the standard schedule applies
pub struct StampDutyCalculator<'a> {
    tables: &'a DutyTables,
}

impl<'a> StampDutyCalculator<'a> {
    pub fn new(tables: &'a DutyTables) -> Self {
        Self { tables }
    }

    /// calculate duty for a region code such as "NSW" (case-insensitive)
    pub fn calculate_for_code(
        &self,
        property_value: Money,
        code: &str,
        is_first_home_buyer: bool,
    ) -> Result<StampDutyResult> {
        let jurisdiction: Jurisdiction = code.parse()?;
        self.calculate(property_value, jurisdiction, is_first_home_buyer)
    }

    pub fn calculate(
        &self,
        property_value: Money,
        jurisdiction: Jurisdiction,
        is_first_home_buyer: bool,
    ) -> Result<StampDutyResult> {
        if !property_value.is_positive() {
            return Err(CalculatorError::invalid(
                "property_value",
                "property value must be greater than 0",
            ));
        }
        if !property_value.is_within_input_limit() {
            return Err(CalculatorError::too_large("property_value"));
        }

        let duty = self.tables.get(jurisdiction)?;
        let full_duty = full_duty(property_value, duty)?;

        let standard = StampDutyResult {
            jurisdiction,
            property_value,
            is_first_home_buyer,
            total: full_duty,
            concession_applied: false,
            concession_kind: ConcessionKind::None,
            amount_saved: Money::ZERO,
        };

        if !is_first_home_buyer {
            return Ok(standard);
        }

        let concession = duty.first_home_buyer;

        if let Some(ceiling) = concession.full_exemption_ceiling {
            if property_value <= ceiling {
                return Ok(StampDutyResult {
                    total: Money::ZERO,
                    concession_applied: true,
                    concession_kind: ConcessionKind::FullExemption,
                    amount_saved: full_duty,
                    ..standard
                });
            }
        }

        if let Some(ceiling) = concession.partial_concession_ceiling {
            if property_value <= ceiling {
                let floor = concession.full_exemption_ceiling.unwrap_or(Money::ZERO);
                let discount = tapered_discount(property_value, floor, ceiling, full_duty);
                return Ok(StampDutyResult {
                    total: full_duty - discount,
                    concession_applied: true,
                    concession_kind: ConcessionKind::PartialConcession,
                    amount_saved: discount,
                    ..standard
                });
            }
        }

        Ok(standard)
    }
}

/// duty before any concession, rounded to whole dollars
fn full_duty(property_value: Money, duty: &JurisdictionDuty) -> Result<Money> {
    let out_of_range = || CalculatorError::ConfigurationError {
        message: format!("duty on {} is out of range for the schedule", property_value),
    };

    match &duty.schedule {
        DutySchedule::FlatAboveThreshold { threshold, rate } => {
            if property_value <= *threshold {
                return Ok(Money::ZERO);
            }
            let duty = property_value
                .checked_mul(rate.as_decimal())
                .ok_or_else(out_of_range)?;
            Ok(duty.round_whole())
        }
        DutySchedule::Brackets { brackets } => {
            let bracket = brackets
                .iter()
                .find(|b| b.covers(property_value))
                .ok_or_else(|| CalculatorError::ConfigurationError {
                    message: format!("no bracket covers property value {}", property_value),
                })?;

            let marginal = bracket.rate_percent / dec!(100);
            let duty = property_value
                .checked_sub(bracket.min)
                .and_then(|in_bracket| in_bracket.checked_mul(marginal))
                .and_then(|tax| tax.checked_add(bracket.base))
                .ok_or_else(out_of_range)?;
            Ok(duty.round_whole())
        }
    }
}

/// discount = full duty x (1 - (value - floor) / (ceiling - floor))
fn tapered_discount(value: Money, floor: Money, ceiling: Money, full_duty: Money) -> Money {
    let range = (ceiling - floor).as_decimal();
    if range <= Decimal::ZERO {
        return Money::ZERO;
    }
    let excess = (value - floor).as_decimal();
    let share = Decimal::ONE - excess / range;
    (full_duty * share).round_whole()
}

/// calculate stamp duty against the given tables
pub fn calculate_stamp_duty(
    tables: &DutyTables,
    property_value: Money,
    jurisdiction: Jurisdiction,
    is_first_home_buyer: bool,
) -> Result<StampDutyResult> {
    StampDutyCalculator::new(tables).calculate(property_value, jurisdiction, is_first_home_buyer)
}
