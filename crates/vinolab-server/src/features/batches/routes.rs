//! Import batch API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/batches` - List batches with sample counts
//! - `DELETE /api/v1/batches/:id` - Delete a batch and all of its samples
//!
//! Batches are created implicitly by sample uploads and imports, so there is
//! no create endpoint.

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::database_error_response;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::{
    commands::{DeleteBatchCommand, DeleteBatchError},
    queries::{ListBatchesError, ListBatchesQuery},
};

/// Creates the batches router
pub fn batches_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/", get(list_batches))
        .route("/:id", delete(delete_batch))
}

/// Delete a batch and its samples
///
/// - `200 OK` - Batch deleted, body carries the number of samples removed
/// - `404 Not Found` - No batch with that id
#[tracing::instrument(skip(pool))]
async fn delete_batch(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, BatchApiError> {
    let Path(id) = id?;
    let response = super::commands::delete::handle(pool, DeleteBatchCommand { id }).await?;

    tracing::info!(
        batch_id = response.id,
        deleted_samples = response.deleted_samples,
        "Batch deleted via API"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// List batches, newest first
#[tracing::instrument(skip(pool))]
async fn list_batches(State(pool): State<SqlitePool>) -> Result<Response, BatchApiError> {
    let response = super::queries::list::handle(pool, ListBatchesQuery::default()).await?;

    let meta = json!({ "total": response.items.len() });

    Ok(
        (StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
            .into_response(),
    )
}

/// Unified error type for batch API endpoints
#[derive(Debug)]
enum BatchApiError {
    Path(PathRejection),
    Delete(DeleteBatchError),
    List(ListBatchesError),
}

impl From<PathRejection> for BatchApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Path(rejection)
    }
}

impl From<DeleteBatchError> for BatchApiError {
    fn from(err: DeleteBatchError) -> Self {
        Self::Delete(err)
    }
}

impl From<ListBatchesError> for BatchApiError {
    fn from(err: ListBatchesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for BatchApiError {
    fn into_response(self) -> Response {
        match self {
            BatchApiError::Path(rejection) => ErrorResponse::new(
                "VALIDATION_ERROR",
                format!("Invalid batch id: {}", rejection.body_text()),
            )
            .into_response_with(StatusCode::BAD_REQUEST),
            BatchApiError::Delete(err @ DeleteBatchError::NotFound(_)) => {
                ErrorResponse::new("NOT_FOUND", err.to_string())
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            BatchApiError::Delete(DeleteBatchError::Database(e)) => {
                database_error_response(&e, "deleting batch")
            },
            BatchApiError::List(ListBatchesError::Database(e)) => {
                database_error_response(&e, "listing batches")
            },
        }
    }
}
