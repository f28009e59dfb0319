use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CalculatorError;

/// australian state or territory whose transfer duty rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 8] = [
        Jurisdiction::Nsw,
        Jurisdiction::Vic,
        Jurisdiction::Qld,
        Jurisdiction::Sa,
        Jurisdiction::Wa,
        Jurisdiction::Tas,
        Jurisdiction::Nt,
        Jurisdiction::Act,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Nsw => "NSW",
            Jurisdiction::Vic => "VIC",
            Jurisdiction::Qld => "QLD",
            Jurisdiction::Sa => "SA",
            Jurisdiction::Wa => "WA",
            Jurisdiction::Tas => "TAS",
            Jurisdiction::Nt => "NT",
            Jurisdiction::Act => "ACT",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = CalculatorError;

    /// case-insensitive match on the region code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Jurisdiction::ALL
            .iter()
            .copied()
            .find(|j| j.code() == upper)
            .ok_or_else(|| CalculatorError::UnknownJurisdiction {
                code: s.to_string(),
            })
    }
}

/// how often a periodic expense is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseFrequency {
    Weekly,
    Fortnightly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl ExpenseFrequency {
    /// number of billing periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            ExpenseFrequency::Weekly => 52,
            ExpenseFrequency::Fortnightly => 26,
            ExpenseFrequency::Monthly => 12,
            ExpenseFrequency::Quarterly => 4,
            ExpenseFrequency::HalfYearly => 2,
            ExpenseFrequency::Yearly => 1,
        }
    }
}

/// named recurring holding cost of an investment property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// derived from the management fee percentage, never supplied directly
    PropertyManagement,
    CouncilRates,
    WaterRates,
    Insurance,
    Maintenance,
    EmergencyServicesLevy,
    LandTax,
    WealthFee,
    Strata,
}

/// first home buyer concession outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConcessionKind {
    #[default]
    None,
    FullExemption,
    PartialConcession,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jurisdiction_parsing_is_case_insensitive() {
        assert_eq!("nsw".parse::<Jurisdiction>().unwrap(), Jurisdiction::Nsw);
        assert_eq!(" Act ".parse::<Jurisdiction>().unwrap(), Jurisdiction::Act);
        for j in Jurisdiction::ALL {
            assert_eq!(j.code().parse::<Jurisdiction>().unwrap(), j);
        }
    }

    #[test]
    fn test_unknown_jurisdiction() {
        let err = "XYZ".parse::<Jurisdiction>().unwrap_err();
        assert_eq!(err, CalculatorError::UnknownJurisdiction { code: "XYZ".to_string() });
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(ExpenseFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(ExpenseFrequency::Fortnightly.periods_per_year(), 26);
        assert_eq!(ExpenseFrequency::Quarterly.periods_per_year(), 4);
        assert_eq!(ExpenseFrequency::Yearly.periods_per_year(), 1);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ExpenseFrequency::HalfYearly).unwrap();
        assert_eq!(json, "\"half-yearly\"");
        let j: Jurisdiction = serde_json::from_str("\"TAS\"").unwrap();
        assert_eq!(j, Jurisdiction::Tas);
    }
}
