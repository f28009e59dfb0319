use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cashflow::{
    calculate_cash_flow, calculate_net_rental_yield, calculate_rental_yield, CashFlowResult,
    NetRentalYield, RentalYield,
};
use crate::config::CalculatorConfig;
use crate::decimal::{Money, Rate};
use crate::duty::{StampDutyCalculator, StampDutyResult};
use crate::errors::{CalculatorError, Result};
use crate::expenses::{annualize_expenses, monthly_total, total_expenses, PeriodicExpense};
use crate::loan::{
    calculate_loan_repayments, calculate_lvr, LoanRepaymentResult, LvrResult, MAX_TERM_YEARS,
    MIN_TERM_YEARS,
};
use crate::projection::{
    calculate_investment_metrics, calculate_projection, InvestmentMetrics, ProjectionEntry,
    ProjectionLoan, ProjectionParams,
};
use crate::stress::{stress_tests, StressTestResult};
use crate::types::Jurisdiction;
use crate::year_by_year::{calculate_year_by_year, YearByYearParams, YearByYearResult};

const WEEKS_PER_YEAR: u32 = 52;

fn default_weeks_rented() -> u32 {
    WEEKS_PER_YEAR
}

fn default_capital_growth() -> Decimal {
    dec!(5)
}

fn default_rental_growth() -> Decimal {
    dec!(3)
}

/// everything a caller supplies for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub purchase_price: Money,
    /// region code such as "NSW", matched case-insensitively
    pub jurisdiction: String,
    #[serde(default)]
    pub is_first_home_buyer: bool,
    pub deposit_amount: Money,
    #[serde(default)]
    pub lmi_premium: Money,
    pub annual_interest_rate_percent: Decimal,
    pub loan_term_years: u32,
    pub weekly_rent: Money,
    #[serde(default = "default_weeks_rented")]
    pub weeks_rented_per_year: u32,
    #[serde(default)]
    pub expenses: Vec<PeriodicExpense>,
    #[serde(default)]
    pub property_management_fee_percent: Decimal,
    #[serde(default = "default_capital_growth")]
    pub capital_growth_rate_percent: Decimal,
    #[serde(default = "default_rental_growth")]
    pub rental_growth_rate_percent: Decimal,
    #[serde(default)]
    pub additional_upfront_costs: Money,
}

impl PropertyInput {
    /// create an input with the required fields; the rest take their defaults
    pub fn new(
        purchase_price: Money,
        jurisdiction: impl Into<String>,
        deposit_amount: Money,
        annual_interest_rate_percent: Decimal,
        loan_term_years: u32,
        weekly_rent: Money,
    ) -> Self {
        Self {
            purchase_price,
            jurisdiction: jurisdiction.into(),
            is_first_home_buyer: false,
            deposit_amount,
            lmi_premium: Money::ZERO,
            annual_interest_rate_percent,
            loan_term_years,
            weekly_rent,
            weeks_rented_per_year: WEEKS_PER_YEAR,
            expenses: Vec::new(),
            property_management_fee_percent: Decimal::ZERO,
            capital_growth_rate_percent: default_capital_growth(),
            rental_growth_rate_percent: default_rental_growth(),
            additional_upfront_costs: Money::ZERO,
        }
    }

    pub fn first_home_buyer(mut self) -> Self {
        self.is_first_home_buyer = true;
        self
    }

    pub fn with_expense(mut self, expense: PeriodicExpense) -> Self {
        self.expenses.push(expense);
        self
    }

    pub fn with_management_fee(mut self, percent: Decimal) -> Self {
        self.property_management_fee_percent = percent;
        self
    }

    pub fn with_growth(mut self, capital_percent: Decimal, rental_percent: Decimal) -> Self {
        self.capital_growth_rate_percent = capital_percent;
        self.rental_growth_rate_percent = rental_percent;
        self
    }

    pub fn with_weeks_rented(mut self, weeks: u32) -> Self {
        self.weeks_rented_per_year = weeks;
        self
    }

    pub fn with_lmi_premium(mut self, premium: Money) -> Self {
        self.lmi_premium = premium;
        self
    }

    pub fn with_additional_costs(mut self, costs: Money) -> Self {
        self.additional_upfront_costs = costs;
        self
    }

    /// check every field once and resolve the jurisdiction; the first
    /// failure is reported
    pub fn validate(&self) -> Result<Jurisdiction> {
        if !self.purchase_price.is_positive() {
            return Err(CalculatorError::invalid(
                "purchase_price",
                "purchase price must be greater than 0",
            ));
        }

        for (field, amount) in [
            ("purchase_price", self.purchase_price),
            ("weekly_rent", self.weekly_rent),
            ("lmi_premium", self.lmi_premium),
            ("additional_upfront_costs", self.additional_upfront_costs),
        ]
        .into_iter()
        .chain(self.expenses.iter().map(|e| ("expenses", e.amount)))
        {
            if !amount.is_within_input_limit() {
                return Err(CalculatorError::too_large(field));
            }
        }

        let jurisdiction: Jurisdiction = self.jurisdiction.parse()?;

        if self.deposit_amount.is_negative() || self.deposit_amount >= self.purchase_price {
            return Err(CalculatorError::invalid(
                "deposit_amount",
                "deposit must be at least 0 and less than the purchase price",
            ));
        }

        let rate = self.annual_interest_rate_percent;
        if rate < Decimal::ZERO || rate > dec!(100) {
            return Err(CalculatorError::invalid(
                "interest_rate",
                "interest rate must be between 0 and 100",
            ));
        }

        if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&self.loan_term_years) {
            return Err(CalculatorError::invalid(
                "loan_term",
                "loan term must be between 1 and 50 years",
            ));
        }

        if self.weekly_rent.is_negative() {
            return Err(CalculatorError::invalid("weekly_rent", "weekly rent cannot be negative"));
        }

        if self.weeks_rented_per_year > WEEKS_PER_YEAR {
            return Err(CalculatorError::invalid(
                "weeks_rented_per_year",
                "weeks rented must be between 0 and 52",
            ));
        }

        let fee = self.property_management_fee_percent;
        if fee < Decimal::ZERO || fee > dec!(100) {
            return Err(CalculatorError::invalid(
                "property_management_fee_percent",
                "management fee must be between 0 and 100",
            ));
        }

        for (field, growth) in [
            ("capital_growth_rate_percent", self.capital_growth_rate_percent),
            ("rental_growth_rate_percent", self.rental_growth_rate_percent),
        ] {
            if growth <= dec!(-100) || growth > dec!(100) {
                return Err(CalculatorError::invalid(
                    field,
                    "growth rate must be greater than -100 and at most 100",
                ));
            }
        }

        if let Some(expense) = self.expenses.iter().find(|e| e.amount.is_negative()) {
            return Err(CalculatorError::invalid(
                "expenses",
                format!("{:?} amount cannot be negative", expense.category),
            ));
        }

        if self.lmi_premium.is_negative() {
            return Err(CalculatorError::invalid("lmi_premium", "lmi premium cannot be negative"));
        }

        if self.additional_upfront_costs.is_negative() {
            return Err(CalculatorError::invalid(
                "additional_upfront_costs",
                "additional upfront costs cannot be negative",
            ));
        }

        Ok(jurisdiction)
    }

    pub fn loan_amount(&self) -> Money {
        self.purchase_price - self.deposit_amount
    }

    /// weekly rent over the weeks actually let
    pub fn annual_rent(&self) -> Money {
        self.weekly_rent * Decimal::from(self.weeks_rented_per_year)
    }
}

/// cash needed to settle the purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpfrontSummary {
    pub purchase_price: Money,
    pub deposit_amount: Money,
    pub loan_amount: Money,
    pub stamp_duty: Money,
    pub lmi_premium: Money,
    pub additional_costs: Money,
    pub total_upfront_costs: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub repayments: LoanRepaymentResult,
    #[serde(flatten)]
    pub lvr: LvrResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yields {
    pub gross: RentalYield,
    pub net: NetRentalYield,
}

/// combined output of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub summary: UpfrontSummary,
    pub stamp_duty: StampDutyResult,
    pub loan_details: LoanDetails,
    pub cash_flow: CashFlowResult,
    pub yields: Yields,
    pub investment_metrics: InvestmentMetrics,
    pub projection: Vec<ProjectionEntry>,
    pub year_by_year: YearByYearResult,
    pub stress_tests: Vec<StressTestResult>,
    pub inputs: PropertyInput,
}

/// runs the full analysis for a property against one configuration
#[derive(Debug, Clone, Default)]
pub struct PropertyCalculator {
    config: CalculatorConfig,
}

impl PropertyCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn calculate(&self, input: &PropertyInput) -> Result<CalculationResult> {
        let jurisdiction = input.validate()?;

        let stamp_duty = StampDutyCalculator::new(&self.config.duty_tables).calculate(
            input.purchase_price,
            jurisdiction,
            input.is_first_home_buyer,
        )?;

        let loan_amount = input.loan_amount();
        let rate = Rate::from_percent(input.annual_interest_rate_percent);
        let repayments = calculate_loan_repayments(loan_amount, rate, input.loan_term_years)?;
        let lvr = calculate_lvr(loan_amount, input.purchase_price)?;

        let summary = UpfrontSummary {
            purchase_price: input.purchase_price,
            deposit_amount: input.deposit_amount,
            loan_amount,
            stamp_duty: stamp_duty.total,
            lmi_premium: input.lmi_premium,
            additional_costs: input.additional_upfront_costs,
            total_upfront_costs: input.deposit_amount
                + stamp_duty.total
                + input.lmi_premium
                + input.additional_upfront_costs,
        };

        let annual_rent = input.annual_rent();
        let annual_expenses = annualize_expenses(
            &input.expenses,
            annual_rent,
            input.property_management_fee_percent,
        );
        let total_annual_expenses = total_expenses(&annual_expenses);

        let cash_flow = calculate_cash_flow(annual_rent, repayments.annual_repayment, &annual_expenses);
        let yields = Yields {
            gross: calculate_rental_yield(annual_rent, input.purchase_price)?,
            net: calculate_net_rental_yield(annual_rent, input.purchase_price, &annual_expenses)?,
        };

        let capital_growth = Rate::from_percent(input.capital_growth_rate_percent);
        let rental_growth = Rate::from_percent(input.rental_growth_rate_percent);

        let projection = calculate_projection(&ProjectionParams {
            purchase_price: input.purchase_price,
            annual_rent,
            loan: ProjectionLoan {
                loan_amount,
                annual_rate: rate,
                term_years: input.loan_term_years,
                annual_repayment: repayments.annual_repayment,
            },
            total_annual_expenses,
            capital_growth,
            rental_growth,
            years: self.config.projection_years,
        })?;
        let investment_metrics = calculate_investment_metrics(&projection, summary.total_upfront_costs)?;

        let year_by_year = calculate_year_by_year(&YearByYearParams {
            purchase_price: input.purchase_price,
            loan_amount,
            annual_rate: rate,
            loan_term_years: input.loan_term_years,
            initial_monthly_rent: annual_rent / dec!(12),
            monthly_expenses: monthly_total(&annual_expenses),
            capital_growth,
            rental_growth,
        })?;

        let stress_tests = stress_tests(
            loan_amount,
            rate,
            input.loan_term_years,
            annual_rent,
            &annual_expenses,
            &self.config.stress_rate_increases,
        )?;

        Ok(CalculationResult {
            summary,
            stamp_duty,
            loan_details: LoanDetails { repayments, lvr },
            cash_flow,
            yields,
            investment_metrics,
            projection,
            year_by_year,
            stress_tests,
            inputs: input.clone(),
        })
    }
}
