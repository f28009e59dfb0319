/// quick start - analyse one investment property
use property_calc_rs::{
    ExpenseCategory, ExpenseFrequency, Money, PeriodicExpense, PropertyCalculator, PropertyInput,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // $750k in NSW with 20% down, renting at $600 a week
    let input = PropertyInput::new(
        Money::from_major(750_000),
        "NSW",
        Money::from_major(150_000),
        dec!(6.2),
        30,
        Money::from_major(600),
    )
    .with_management_fee(dec!(7))
    .with_expense(PeriodicExpense::new(
        ExpenseCategory::CouncilRates,
        Money::from_major(550),
        ExpenseFrequency::Quarterly,
    ))
    .with_expense(PeriodicExpense::yearly(ExpenseCategory::Insurance, Money::from_major(1_600)));

    let result = PropertyCalculator::default().calculate(&input)?;

    println!("stamp duty:        {}", result.stamp_duty.total);
    println!("upfront costs:     {}", result.summary.total_upfront_costs);
    println!("monthly repayment: {}", result.loan_details.repayments.monthly_repayment);
    println!("lvr:               {}%", result.loan_details.lvr.lvr);
    println!("weekly cash flow:  {}", result.cash_flow.cash_flow.weekly);
    println!("gross yield:       {}%", result.yields.gross.gross_yield);
    println!("net yield:         {}%", result.yields.net.net_yield);
    println!("self-sufficient:   {}", result.year_by_year.self_sufficient_year);

    let metrics = &result.investment_metrics;
    println!("net worth at 30:   {}", metrics.final_net_worth);
    match metrics.average_annual_return.value() {
        Some(cagr) => println!("annual return:     {}%", cagr),
        None => println!("annual return:     undefined"),
    }

    Ok(())
}
