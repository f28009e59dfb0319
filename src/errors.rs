use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid input: {field} - {reason}")]
    InvalidInput {
        field: String,
        reason: String,
    },

    #[error("unknown jurisdiction: {code}. must be one of: NSW, VIC, QLD, SA, WA, TAS, NT, ACT")]
    UnknownJurisdiction {
        code: String,
    },

    #[error("configuration error: {message}")]
    ConfigurationError {
        message: String,
    },
}

impl CalculatorError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CalculatorError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// an input large enough that a derived figure would overflow
    pub(crate) fn too_large(field: &str) -> Self {
        Self::invalid(field, "value is too large to calculate")
    }
}

impl From<serde_json::Error> for CalculatorError {
    fn from(e: serde_json::Error) -> Self {
        CalculatorError::ConfigurationError {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
