//! Database error handling utilities
//!
//! Maps sqlx failures onto the HTTP error envelope and recognises the
//! foreign key violation raised for an unknown batch.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vinolab_server::features::shared::error_helpers::database_error_response;
//!
//! SampleApiError::List(ListSamplesError::Database(e)) => {
//!     database_error_response(&e, "listing samples")
//! }
//! ```

use axum::{http::StatusCode, response::Response};
use sqlx::Error as SqlxError;

use crate::api::response::ErrorResponse;
use crate::db::is_unavailable;

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Status and code for a storage failure
///
/// Connectivity failures are `503 STORE_UNAVAILABLE`, everything else is
/// `500 INTERNAL_ERROR`.
pub fn database_error_status(error: &SqlxError) -> (StatusCode, &'static str) {
    if is_unavailable(error) {
        (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
    }
}

/// Log a storage failure and render the matching error response
pub fn database_error_response(error: &SqlxError, operation: &str) -> Response {
    let (status, code) = database_error_status(error);
    tracing::error!(error = %error, operation, "Database error");

    let message = if status == StatusCode::SERVICE_UNAVAILABLE {
        "The sample store is unavailable"
    } else {
        "A database error occurred"
    };
    ErrorResponse::new(code, message).into_response_with(status)
}
