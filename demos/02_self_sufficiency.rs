/// self sufficiency - year by year until rent covers the property
use property_calc_rs::{
    calculate_loan_repayments, calculate_year_by_year, Money, Rate, YearByYearParams,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loan_amount = Money::from_major(520_000);
    let rate = Rate::from_percent(dec!(6.1));
    let repayments = calculate_loan_repayments(loan_amount, rate, 30)?;
    println!("monthly repayment: {}\n", repayments.monthly_repayment);

    let result = calculate_year_by_year(&YearByYearParams {
        purchase_price: Money::from_major(650_000),
        loan_amount,
        annual_rate: rate,
        loan_term_years: 30,
        initial_monthly_rent: Money::from_major(2_600),
        monthly_expenses: Money::from_major(550),
        capital_growth: Rate::from_percent(dec!(5)),
        rental_growth: Rate::from_percent(dec!(4)),
    })?;

    println!(
        "{:>4} {:>10} {:>10} {:>8} {:>10} {:>10}",
        "year", "value", "loan", "equity%", "rent/mo", "cash flow"
    );
    for entry in &result.yearly_data {
        println!(
            "{:>4} {:>10} {:>10} {:>8} {:>10} {:>10}{}",
            entry.year,
            entry.property_value.to_string(),
            entry.loan_balance.to_string(),
            entry.equity_percentage.to_string(),
            entry.monthly_rent.to_string(),
            entry.annual_cash_flow.to_string(),
            if Some(entry.year) == result.self_sufficient_year.year() { "  <- self-sufficient" } else { "" },
        );
    }

    println!("\nself-sufficient year: {}", result.summary.self_sufficient_year);
    println!("final equity:         {}", result.summary.final_equity);

    Ok(())
}
