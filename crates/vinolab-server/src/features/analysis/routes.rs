//! Analysis API routes
//!
//! - `GET /api/v1/analysis` - Train and evaluate on the stored samples
//!
//! An empty store is a successful `no_data` outcome. Data that cannot be
//! split (a single class, a class with one sample, too few rows overall)
//! answers `422 INSUFFICIENT_DATA` with the per-class counts in `details`.

use crate::analysis::AnalysisError;
use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::database_error_response;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::queries::{RunAnalysisError, RunAnalysisQuery};

pub fn analysis_routes() -> Router<SqlitePool> {
    Router::new().route("/", get(run_analysis))
}

#[tracing::instrument(skip(pool))]
async fn run_analysis(State(pool): State<SqlitePool>) -> Result<Response, AnalysisApiError> {
    let outcome = super::queries::run::handle(pool, RunAnalysisQuery::default()).await?;

    if let Some(report) = outcome.report() {
        tracing::info!(
            accuracy = report.accuracy,
            test_size = report.test_size,
            "Analysis served via API"
        );
    }

    Ok((StatusCode::OK, Json(ApiResponse::success(outcome))).into_response())
}

#[derive(Debug)]
struct AnalysisApiError(RunAnalysisError);

impl From<RunAnalysisError> for AnalysisApiError {
    fn from(err: RunAnalysisError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AnalysisApiError {
    fn into_response(self) -> Response {
        match self.0 {
            RunAnalysisError::Analysis(AnalysisError::InsufficientData {
                reason,
                class_counts,
            }) => {
                tracing::info!(%reason, ?class_counts, "Analysis refused: insufficient data");
                ErrorResponse::with_details(
                    "INSUFFICIENT_DATA",
                    format!("Insufficient data for analysis: {}", reason),
                    json!({
                        "reason": reason,
                        "class_counts": class_counts,
                    }),
                )
                .into_response_with(StatusCode::UNPROCESSABLE_ENTITY)
            },
            RunAnalysisError::Analysis(
                err @ (AnalysisError::ShapeMismatch { .. } | AnalysisError::ModelFit(_)),
            ) => {
                tracing::error!(error = %err, "Analysis failed");
                ErrorResponse::new("INTERNAL_ERROR", "Analysis failed")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
            RunAnalysisError::Task(e) => {
                tracing::error!(error = %e, "Analysis task did not complete");
                ErrorResponse::new("INTERNAL_ERROR", "Analysis failed")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
            RunAnalysisError::CorruptSample { id, target } => {
                tracing::error!(sample_id = id, target, "Stored sample has an invalid target");
                ErrorResponse::new("INTERNAL_ERROR", "A stored sample is invalid")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
            RunAnalysisError::Database(e) => database_error_response(&e, "running analysis"),
        }
    }
}
