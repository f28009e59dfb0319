/// stamp duty - compare every jurisdiction and the first home buyer concessions
use property_calc_rs::{
    calculate_stamp_duty, ConcessionKind, DutyTables, Jurisdiction, Money,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tables = DutyTables::australia();
    let price = Money::from_major(700_000);

    println!("=== duty on {} ===\n", price);
    println!("{:<5} {:>12} {:>12} {:>12}", "", "investor", "first home", "saved");

    for jurisdiction in Jurisdiction::ALL {
        let investor = calculate_stamp_duty(&tables, price, jurisdiction, false)?;
        let first_home = calculate_stamp_duty(&tables, price, jurisdiction, true)?;

        let note = match first_home.concession_kind {
            ConcessionKind::FullExemption => " (exempt)",
            ConcessionKind::PartialConcession => " (partial)",
            ConcessionKind::None => "",
        };

        println!(
            "{:<5} {:>12} {:>12} {:>12}{}",
            jurisdiction.code(),
            investor.total.to_string(),
            first_home.total.to_string(),
            first_home.amount_saved.to_string(),
            note,
        );
    }

    // the taper across the NSW partial concession band
    println!("\n=== NSW first home buyer taper ===\n");
    for price in (750_000..=1_050_000).step_by(50_000) {
        let duty = calculate_stamp_duty(&tables, Money::from_major(price), Jurisdiction::Nsw, true)?;
        println!("{:>10} -> {:>8} saved {:>8}", price, duty.total.to_string(), duty.amount_saved.to_string());
    }

    Ok(())
}
