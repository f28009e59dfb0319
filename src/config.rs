use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::Jurisdiction;

/// calculator configuration, built once and shared read-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatorConfig {
    pub duty_tables: DutyTables,
    /// interest rate increases (in percentage points) to stress test
    pub stress_rate_increases: Vec<Decimal>,
    /// horizon of the long-range projection, in years
    pub projection_years: u32,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            duty_tables: DutyTables::australia(),
            stress_rate_increases: vec![dec!(0.25), dec!(0.50), dec!(1.00)],
            projection_years: 30,
        }
    }
}

impl CalculatorConfig {
    pub fn with_duty_tables(mut self, duty_tables: DutyTables) -> Self {
        self.duty_tables = duty_tables;
        self
    }

    pub fn with_stress_rate_increases(mut self, increases: Vec<Decimal>) -> Self {
        self.stress_rate_increases = increases;
        self
    }

    /// load from json and check the duty tables
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CalculatorConfig = serde_json::from_str(json)?;
        config.duty_tables.validate()?;
        if config.projection_years == 0 {
            return Err(CalculatorError::ConfigurationError {
                message: "projection_years must be at least 1".to_string(),
            });
        }
        Ok(config)
    }
}

/// one tier of a bracketed duty schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyBracket {
    pub min: Money,
    /// upper bound of the tier, None for the open-ended top tier
    pub max: Option<Money>,
    pub base: Money,
    /// marginal rate on the value above `min`, as a percentage
    pub rate_percent: Decimal,
}

impl DutyBracket {
    pub fn new(min: i64, max: Option<i64>, base: i64, rate_percent: Decimal) -> Self {
        Self {
            min: Money::from_major(min),
            max: max.map(Money::from_major),
            base: Money::from_major(base),
            rate_percent,
        }
    }

    /// true when `value` lies in [min, max]; adjacent tiers share a bound
    /// and the lower tier is found first
    pub fn covers(&self, value: Money) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

/// how full duty is computed for a jurisdiction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DutySchedule {
    Brackets { brackets: Vec<DutyBracket> },
    /// no duty at or below the threshold, otherwise value x rate
    FlatAboveThreshold { threshold: Money, rate: Rate },
}

/// first home buyer concession ceilings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FirstHomeBuyerConcession {
    pub full_exemption_ceiling: Option<Money>,
    pub partial_concession_ceiling: Option<Money>,
}

impl FirstHomeBuyerConcession {
    pub fn new(full: Option<i64>, partial: Option<i64>) -> Self {
        Self {
            full_exemption_ceiling: full.map(Money::from_major),
            partial_concession_ceiling: partial.map(Money::from_major),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionDuty {
    pub schedule: DutySchedule,
    pub first_home_buyer: FirstHomeBuyerConcession,
}

/// per-jurisdiction transfer duty tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyTables {
    pub jurisdictions: BTreeMap<Jurisdiction, JurisdictionDuty>,
}

impl DutyTables {
    pub fn new() -> Self {
        Self {
            jurisdictions: BTreeMap::new(),
        }
    }

    pub fn with_jurisdiction(mut self, jurisdiction: Jurisdiction, duty: JurisdictionDuty) -> Self {
        self.jurisdictions.insert(jurisdiction, duty);
        self
    }

    pub fn get(&self, jurisdiction: Jurisdiction) -> Result<&JurisdictionDuty> {
        self.jurisdictions
            .get(&jurisdiction)
            .ok_or_else(|| CalculatorError::UnknownJurisdiction {
                code: jurisdiction.code().to_string(),
            })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tables: DutyTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// check bracket tables start at zero, are contiguous and end open-ended
    pub fn validate(&self) -> Result<()> {
        for (jurisdiction, duty) in &self.jurisdictions {
            let fail = |message: String| CalculatorError::ConfigurationError {
                message: format!("{}: {}", jurisdiction, message),
            };

            if let DutySchedule::FlatAboveThreshold { rate, .. } = &duty.schedule {
                if !(Decimal::ZERO..=Decimal::ONE).contains(&rate.as_decimal()) {
                    return Err(fail(format!("flat rate {} is outside 0% to 100%", rate)));
                }
            }

            if let DutySchedule::Brackets { brackets } = &duty.schedule {
                let first = brackets
                    .first()
                    .ok_or_else(|| fail("bracket table is empty".to_string()))?;
                if let Some(b) = brackets
                    .iter()
                    .find(|b| !(Decimal::ZERO..=dec!(100)).contains(&b.rate_percent))
                {
                    return Err(fail(format!("bracket rate {}% is outside 0 to 100", b.rate_percent)));
                }
                if !first.min.is_zero() {
                    return Err(fail(format!("first bracket starts at {}", first.min)));
                }
                for pair in brackets.windows(2) {
                    match pair[0].max {
                        Some(max) if max == pair[1].min => {}
                        Some(max) => {
                            return Err(fail(format!(
                                "gap or overlap between {} and {}",
                                max, pair[1].min
                            )))
                        }
                        None => return Err(fail("unbounded bracket is not last".to_string())),
                    }
                }
                if brackets.last().and_then(|b| b.max).is_some() {
                    return Err(fail("last bracket must be unbounded".to_string()));
                }
            }

            let concession = duty.first_home_buyer;
            if let (Some(full), Some(partial)) = (
                concession.full_exemption_ceiling,
                concession.partial_concession_ceiling,
            ) {
                if partial <= full {
                    return Err(fail(format!(
                        "partial concession ceiling {} must exceed full exemption ceiling {}",
                        partial, full
                    )));
                }
            }
        }
        Ok(())
    }

    /// point-in-time snapshot of the australian transfer duty schedules
    pub fn australia() -> Self {
        use Jurisdiction::*;

        Self::new()
            .with_jurisdiction(
                Nsw,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(16_000), 0, dec!(1.25)),
                            DutyBracket::new(16_000, Some(32_000), 200, dec!(1.5)),
                            DutyBracket::new(32_000, Some(85_000), 440, dec!(1.75)),
                            DutyBracket::new(85_000, Some(319_000), 1_368, dec!(3.5)),
                            DutyBracket::new(319_000, Some(1_064_000), 9_558, dec!(4.5)),
                            DutyBracket::new(1_064_000, Some(3_238_000), 43_083, dec!(5.5)),
                            DutyBracket::new(3_238_000, None, 162_660, dec!(7)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(800_000), Some(1_000_000)),
                },
            )
            .with_jurisdiction(
                Vic,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(25_000), 0, dec!(1.4)),
                            DutyBracket::new(25_000, Some(130_000), 350, dec!(2.4)),
                            DutyBracket::new(130_000, Some(960_000), 2_870, dec!(6)),
                            DutyBracket::new(960_000, None, 52_670, dec!(5.5)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(600_000), Some(750_000)),
                },
            )
            .with_jurisdiction(
                Qld,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(5_000), 0, dec!(0)),
                            DutyBracket::new(5_000, Some(75_000), 0, dec!(1.5)),
                            DutyBracket::new(75_000, Some(540_000), 1_050, dec!(3.5)),
                            DutyBracket::new(540_000, Some(1_000_000), 17_325, dec!(4.5)),
                            DutyBracket::new(1_000_000, None, 38_025, dec!(5.75)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(500_000), None),
                },
            )
            .with_jurisdiction(
                Sa,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(12_000), 0, dec!(1)),
                            DutyBracket::new(12_000, Some(30_000), 120, dec!(2)),
                            DutyBracket::new(30_000, Some(50_000), 480, dec!(3)),
                            DutyBracket::new(50_000, Some(100_000), 1_080, dec!(3.5)),
                            DutyBracket::new(100_000, Some(200_000), 2_830, dec!(4)),
                            DutyBracket::new(200_000, Some(250_000), 6_830, dec!(4.25)),
                            DutyBracket::new(250_000, Some(300_000), 8_955, dec!(4.75)),
                            DutyBracket::new(300_000, Some(500_000), 11_330, dec!(5)),
                            DutyBracket::new(500_000, None, 21_330, dec!(5.5)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(650_000), None),
                },
            )
            .with_jurisdiction(
                Wa,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(120_000), 0, dec!(1.9)),
                            DutyBracket::new(120_000, Some(150_000), 2_280, dec!(2.85)),
                            DutyBracket::new(150_000, Some(360_000), 3_135, dec!(3.8)),
                            DutyBracket::new(360_000, Some(725_000), 11_115, dec!(4.75)),
                            DutyBracket::new(725_000, None, 28_453, dec!(5.15)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(430_000), Some(530_000)),
                },
            )
            .with_jurisdiction(
                Tas,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(3_000), 0, dec!(0)),
                            DutyBracket::new(3_000, Some(25_000), 50, dec!(1.75)),
                            DutyBracket::new(25_000, Some(75_000), 435, dec!(2.25)),
                            DutyBracket::new(75_000, Some(200_000), 1_560, dec!(3.5)),
                            DutyBracket::new(200_000, Some(375_000), 5_935, dec!(4)),
                            DutyBracket::new(375_000, Some(725_000), 12_935, dec!(4.25)),
                            DutyBracket::new(725_000, None, 27_810, dec!(4.5)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(600_000), None),
                },
            )
            .with_jurisdiction(
                Nt,
                JurisdictionDuty {
                    schedule: DutySchedule::FlatAboveThreshold {
                        threshold: Money::from_major(525_000),
                        rate: Rate::from_decimal(dec!(0.0645)),
                    },
                    first_home_buyer: FirstHomeBuyerConcession::new(Some(650_000), None),
                },
            )
            .with_jurisdiction(
                Act,
                JurisdictionDuty {
                    schedule: DutySchedule::Brackets {
                        brackets: vec![
                            DutyBracket::new(0, Some(200_000), 0, dec!(0)),
                            DutyBracket::new(200_000, Some(300_000), 100, dec!(2.2)),
                            DutyBracket::new(300_000, Some(500_000), 2_300, dec!(3.4)),
                            DutyBracket::new(500_000, Some(750_000), 9_100, dec!(4.32)),
                            DutyBracket::new(750_000, Some(1_000_000), 19_900, dec!(5.9)),
                            DutyBracket::new(1_000_000, Some(1_455_000), 34_650, dec!(6.4)),
                            DutyBracket::new(1_455_000, None, 63_770, dec!(7)),
                        ],
                    },
                    first_home_buyer: FirstHomeBuyerConcession::none(),
                },
            )
    }
}

impl Default for DutyTables {
    fn default() -> Self {
        Self::australia()
    }
}
