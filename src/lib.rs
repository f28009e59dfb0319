pub mod calculation;
pub mod cashflow;
pub mod config;
pub mod decimal;
pub mod duty;
pub mod errors;
pub mod expenses;
pub mod loan;
pub mod projection;
pub mod service;
pub mod stress;
pub mod types;
pub mod year_by_year;

// re-export key types
pub use calculation::{
    CalculationResult, LoanDetails, PropertyCalculator, PropertyInput, UpfrontSummary, Yields,
};
pub use cashflow::{
    calculate_cash_flow, calculate_net_rental_yield, calculate_rental_yield, CashFlowResult,
    CostBreakdown, NetRentalYield, PeriodicAmount, RentalYield,
};
pub use config::{
    CalculatorConfig, DutyBracket, DutySchedule, DutyTables, FirstHomeBuyerConcession,
    JurisdictionDuty,
};
pub use decimal::{Money, Rate};
pub use duty::{calculate_stamp_duty, StampDutyCalculator, StampDutyResult};
pub use errors::{CalculatorError, Result};
pub use expenses::{annualize_expenses, AnnualExpenses, PeriodicExpense};
pub use loan::{
    calculate_loan_repayments, calculate_lvr, generate_amortization_schedule,
    AmortizationSchedule, AmortizationScheduleEntry, LoanRepaymentResult, LvrResult,
};
pub use projection::{
    calculate_30_year_projection, calculate_investment_metrics, calculate_projection,
    InvestmentMetrics, MilestoneSnapshot, Milestones, ProjectionEntry, ProjectionLoan,
    ProjectionParams, ReturnMeasure,
};
pub use service::{CalculationRecord, CalculationService, Envelope};
pub use stress::{stress_test, stress_tests, StressTestResult};
pub use types::{ConcessionKind, ExpenseCategory, ExpenseFrequency, Jurisdiction};
pub use year_by_year::{
    calculate_year_by_year, SelfSufficientYear, YearByYearEntry, YearByYearParams,
    YearByYearResult, YearByYearSummary,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
