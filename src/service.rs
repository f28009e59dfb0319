use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{CalculationResult, PropertyCalculator, PropertyInput};
use crate::decimal::{Money, Rate};
use crate::duty::{StampDutyCalculator, StampDutyResult};
use crate::errors::Result;
use crate::loan::{calculate_loan_repayments, LoanRepaymentResult};

/// success/error wrapper returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.data, self.error) {
            (Some(data), _) if self.success => Ok(data),
            (_, Some(error)) => Err(error),
            _ => Err("empty envelope".to_string()),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(e.to_string()),
        }
    }
}

/// a stamped calculation ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub result: CalculationResult,
}

impl CalculationRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// boundary between callers and the calculator. errors are folded into an
/// [`Envelope`] rather than propagated, and full calculations are stamped with
/// an id and generation time so a persistence collaborator can store them verbatim
pub struct CalculationService {
    calculator: PropertyCalculator,
    time_provider: SafeTimeProvider,
}

impl CalculationService {
    pub fn new(calculator: PropertyCalculator, time_provider: SafeTimeProvider) -> Self {
        Self {
            calculator,
            time_provider,
        }
    }

    pub fn calculator(&self) -> &PropertyCalculator {
        &self.calculator
    }

    /// run a full calculation and stamp the result
    pub fn calculate(&self, input: &PropertyInput) -> Envelope<CalculationRecord> {
        self.try_calculate(input).into()
    }

    pub fn try_calculate(&self, input: &PropertyInput) -> Result<CalculationRecord> {
        let id = Uuid::new_v4();

        match self.calculator.calculate(input) {
            Ok(result) => {
                info!(
                    calculation_id = %id,
                    jurisdiction = %result.stamp_duty.jurisdiction,
                    purchase_price = %result.summary.purchase_price,
                    monthly_repayment = %result.loan_details.repayments.monthly_repayment,
                    annual_cash_flow = %result.cash_flow.cash_flow.annual,
                    self_sufficient_year = %result.year_by_year.self_sufficient_year,
                    "property calculation completed"
                );

                Ok(CalculationRecord {
                    id,
                    generated_at: self.time_provider.now(),
                    result,
                })
            }
            Err(e) => {
                warn!(calculation_id = %id, error = %e, "property calculation rejected");
                Err(e)
            }
        }
    }

    /// stamp duty alone, for a region code
    pub fn stamp_duty_only(
        &self,
        purchase_price: Money,
        jurisdiction: &str,
        is_first_home_buyer: bool,
    ) -> Envelope<StampDutyResult> {
        let result = StampDutyCalculator::new(&self.calculator.config().duty_tables)
            .calculate_for_code(purchase_price, jurisdiction, is_first_home_buyer);

        if let Err(e) = &result {
            warn!(jurisdiction, error = %e, "stamp duty calculation rejected");
        }
        result.into()
    }

    /// loan repayments alone
    pub fn loan_repayments_only(
        &self,
        loan_amount: Money,
        annual_interest_rate_percent: Decimal,
        loan_term_years: u32,
    ) -> Envelope<LoanRepaymentResult> {
        let result = calculate_loan_repayments(
            loan_amount,
            Rate::from_percent(annual_interest_rate_percent),
            loan_term_years,
        );

        if let Err(e) = &result {
            warn!(error = %e, "loan repayment calculation rejected");
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExpenseCategory, Jurisdiction};
    use crate::expenses::PeriodicExpense;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn service() -> CalculationService {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap(),
        ));
        CalculationService::new(PropertyCalculator::default(), time)
    }

    fn input() -> PropertyInput {
        PropertyInput::new(
            Money::from_major(650_000),
            "QLD",
            Money::from_major(130_000),
            dec!(6.2),
            30,
            Money::from_major(620),
        )
        .with_management_fee(dec!(8))
        .with_expense(PeriodicExpense::yearly(ExpenseCategory::CouncilRates, Money::from_major(2_400)))
    }

    #[test]
    fn test_calculation_is_stamped() {
        let envelope = service().calculate(&input());

        assert!(envelope.success);
        assert!(envelope.error.is_none());
        let record = envelope.data.unwrap();
        assert_eq!(record.generated_at, Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap());
        assert_eq!(record.result.stamp_duty.jurisdiction, Jurisdiction::Qld);
    }

    #[test]
    fn test_each_calculation_gets_new_id() {
        let service = service();
        let a = service.try_calculate(&input()).unwrap();
        let b = service.try_calculate(&input()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.result, b.result);
    }

    #[test]
    fn test_rejection_is_wrapped() {
        let mut bad = input();
        bad.jurisdiction = "ZZ".to_string();
        let envelope = service().calculate(&bad);

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.error.unwrap().contains("unknown jurisdiction: ZZ"));
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = service().try_calculate(&input()).unwrap();
        let json = record.to_json().unwrap();
        let restored = CalculationRecord::from_json(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_record_json_rejects_garbage() {
        let err = CalculationRecord::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::errors::CalculatorError::ConfigurationError { .. }));
    }

    #[test]
    fn test_quick_operations() {
        let service = service();

        let duty = service.stamp_duty_only(Money::from_major(600_000), "nsw", false);
        assert_eq!(duty.into_result().unwrap().total, Money::from_major(22_203));

        let loan = service.loan_repayments_only(Money::from_major(500_000), dec!(6), 30);
        assert_eq!(loan.into_result().unwrap().monthly_repayment, Money::from_minor(299_775));

        let bad = service.loan_repayments_only(Money::from_major(500_000), dec!(6), 0);
        assert!(!bad.success);
        assert!(bad.into_result().unwrap_err().contains("loan term"));
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(Envelope::<u32>::err("nope")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "nope" }));
    }
}
