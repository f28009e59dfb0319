pub mod amortization;
pub mod repayment;

pub use amortization::{
    generate_amortization_schedule, AmortizationSchedule, AmortizationScheduleEntry,
};
pub use repayment::{
    calculate_loan_repayments, calculate_lvr, validate_loan_terms, LoanRepaymentResult,
    LvrResult, LMI_THRESHOLD_PERCENT, MAX_TERM_YEARS, MIN_TERM_YEARS,
};

pub(crate) use repayment::monthly_instalment;
