//! Error types for rule decoding.
//!
//! Only decoding can fail as an error. Records that decode but cannot be
//! translated are reported through [`crate::InvalidRule`] instead.

use snafu::Snafu;

use crate::category::RuleCategory;

/// Result type for rule operations.
pub type Result<T, E = RuleError> = std::result::Result<T, E>;

/// Errors that abort translation of a whole payload.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuleError {
    /// The payload is not a valid rule envelope for its category.
    #[snafu(display("failed to decode {} rules: {}", category, source))]
    Decode {
        /// Category whose payload failed to decode.
        category: RuleCategory,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl RuleError {
    /// Category of the payload that failed.
    pub fn category(&self) -> RuleCategory {
        match self {
            RuleError::Decode { category, .. } => *category,
        }
    }
}
