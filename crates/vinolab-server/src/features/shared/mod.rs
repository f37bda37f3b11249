//! Shared utilities and types for feature modules
//!
//! This module contains reusable code to reduce duplication across feature implementations.
//!
//! # Contents
//!
//! - **validation**: Input validation for batch sources and sample fields
//! - **error_helpers**: Database error handling utilities
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod error_helpers;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use error_helpers::database_error_response;
pub use validation::{
    validate_sample, validate_source, SampleValidationError, SourceValidationError,
    MAX_SOURCE_LENGTH,
};
