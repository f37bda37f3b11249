//! Shared validation utilities
//!
//! Request payloads carry every sample field as optional so a missing value is
//! reported as a validation error instead of a deserialization failure.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vinolab_server::features::shared::validation::{validate_source, validate_sample};
//!
//! let source = validate_source("  sklearn ", MAX_SOURCE_LENGTH)?;
//! let (features, class) = validate_sample(Some(13.2), Some(1.78), Some(4.38), Some(0))?;
//! ```

use thiserror::Error;
use vinolab_common::{Features, WineClass};

/// Longest accepted batch source label, in characters
pub const MAX_SOURCE_LENGTH: usize = 255;

/// Errors that can occur during batch source validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceValidationError {
    #[error("Source is required and cannot be empty")]
    Required,

    #[error("Source must be between 1 and {max_length} characters")]
    TooLong { max_length: usize },
}

/// Errors that can occur while validating one sample's fields
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleValidationError {
    #[error("Feature '{feature}' is required")]
    MissingFeature { feature: &'static str },

    #[error("Feature '{feature}' must be a finite number, got {value}")]
    NonFiniteFeature { feature: &'static str, value: f64 },

    #[error("Target is required")]
    MissingTarget,

    #[error("Target must be one of 0, 1, 2, got {0}")]
    InvalidTarget(i64),
}

/// Validate a batch source label and return it trimmed
///
/// # Rules
/// - Must not be empty after trimming whitespace
/// - Must not exceed max_length characters after trimming
pub fn validate_source(source: &str, max_length: usize) -> Result<String, SourceValidationError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(SourceValidationError::Required);
    }

    if trimmed.chars().count() > max_length {
        return Err(SourceValidationError::TooLong { max_length });
    }

    Ok(trimmed.to_string())
}

fn require_feature(
    feature: &'static str,
    value: Option<f64>,
) -> Result<f64, SampleValidationError> {
    let value = value.ok_or(SampleValidationError::MissingFeature { feature })?;
    if !value.is_finite() {
        return Err(SampleValidationError::NonFiniteFeature { feature, value });
    }
    Ok(value)
}

/// Validate a target label
pub fn validate_target(target: Option<i64>) -> Result<WineClass, SampleValidationError> {
    let target = target.ok_or(SampleValidationError::MissingTarget)?;
    WineClass::try_from(target).map_err(|_| SampleValidationError::InvalidTarget(target))
}

/// Validate the three feature values and the target of one sample
///
/// Features are checked in column order, then the target.
pub fn validate_sample(
    alcohol: Option<f64>,
    malic_acid: Option<f64>,
    color_intensity: Option<f64>,
    target: Option<i64>,
) -> Result<(Features, WineClass), SampleValidationError> {
    let features = Features {
        alcohol: require_feature("alcohol", alcohol)?,
        malic_acid: require_feature("malic_acid", malic_acid)?,
        color_intensity: require_feature("color_intensity", color_intensity)?,
    };
    let class = validate_target(target)?;
    Ok((features, class))
}
