//! Error types for Vinolab domain values

use thiserror::Error;

/// Result type alias for Vinolab domain operations
pub type Result<T> = std::result::Result<T, VinolabError>;

/// Main error type for domain value construction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VinolabError {
    #[error("Invalid target {0}: must be one of 0, 1, 2")]
    InvalidTarget(i64),

    #[error("Invalid value for {feature}: {reason}")]
    InvalidFeature {
        feature: &'static str,
        reason: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl VinolabError {
    /// Create an invalid feature error for the named column
    pub fn invalid_feature(feature: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidFeature {
            feature,
            reason: reason.into(),
        }
    }
}
