//! Prior parsing errors

use thiserror::Error;

/// Result type for prior parsing
pub type Result<T> = std::result::Result<T, PriorError>;

/// Errors produced while parsing a prior declaration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriorError {
    #[error("unknown distribution: {0}")]
    UnknownDistribution(String),

    #[error("missing distribution name")]
    MissingDistribution,

    #[error("{family} takes {expected} argument(s), got {found}")]
    ArgCount {
        family: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{family}: invalid numeric argument '{token}'")]
    BadNumber { family: &'static str, token: String },

    #[error("{family}: {reason} (got {value})")]
    InvalidArgument {
        family: &'static str,
        reason: &'static str,
        value: f64,
    },
}
