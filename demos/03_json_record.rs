/// json record - stamped calculations through the service layer
use chrono::{TimeZone, Utc};
use property_calc_rs::{
    CalculationRecord, CalculationService, Money, PropertyCalculator, PropertyInput,
    SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("property_calc_rs=info")),
        )
        .init();

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
    ));
    let service = CalculationService::new(PropertyCalculator::default(), time);

    let input = PropertyInput::new(
        Money::from_major(580_000),
        "vic",
        Money::from_major(116_000),
        dec!(6.4),
        30,
        Money::from_major(520),
    )
    .with_management_fee(dec!(6.5));

    // a successful calculation, stored and restored
    let envelope = service.calculate(&input);
    let record = envelope.into_result()?;
    let json = record.to_json_pretty()?;
    println!("record {} ({} bytes)", record.id, json.len());

    let restored = CalculationRecord::from_json(&json)?;
    println!("restored matches: {}", restored == record);

    // a rejected calculation comes back as an error envelope
    let mut bad = input.clone();
    bad.jurisdiction = "XYZ".to_string();
    let rejected = service.calculate(&bad);
    println!("\n{}", serde_json::to_string_pretty(&rejected)?);

    // quick operations
    let duty = service.stamp_duty_only(Money::from_major(580_000), "VIC", false);
    println!("\n{}", serde_json::to_string_pretty(&duty)?);

    Ok(())
}
