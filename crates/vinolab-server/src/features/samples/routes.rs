//! Sample API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/samples?batch_id=3` - List samples, newest first
//! - `POST /api/v1/samples` - Add a sample under a source label
//! - `POST /api/v1/samples/import` - Bulk import rows into one batch
//! - `GET /api/v1/samples/:id` - Get a single sample with its batch
//! - `DELETE /api/v1/samples/:id` - Delete a sample
//! - `GET /api/v1/summary` - Counts and latest sample
//!
//! # Examples
//!
//! ```rust,ignore
//! use axum::Router;
//! use vinolab_server::features::samples::routes::samples_routes;
//!
//! let app = Router::new()
//!     .nest("/api/v1/samples", samples_routes())
//!     .with_state(pool);
//! ```

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::database_error_response;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::SqlitePool;

use super::{
    commands::{
        AddSampleCommand, AddSampleError, DeleteSampleCommand, DeleteSampleError,
        ImportSamplesCommand, ImportSamplesError,
    },
    queries::{
        GetSampleError, GetSampleQuery, ListSamplesError, ListSamplesQuery, SummaryError,
        SummaryQuery,
    },
};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the samples router
pub fn samples_routes() -> Router<SqlitePool> {
    Router::new()
        .route("/", get(list_samples).post(add_sample))
        .route("/import", post(import_samples))
        .route("/:id", get(get_sample).delete(delete_sample))
}

/// Creates the summary router
pub fn summary_routes() -> Router<SqlitePool> {
    Router::new().route("/", get(summary))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Add a sample
///
/// # Request Body
///
/// ```json
/// {
///   "source": "manual",
///   "alcohol": 13.2,
///   "malic_acid": 1.78,
///   "color_intensity": 4.38,
///   "target": 0
/// }
/// ```
///
/// `source` defaults to `"-"` when omitted.
///
/// # Response
///
/// - `201 Created` - Sample stored
/// - `400 Bad Request` - Missing or invalid field
#[tracing::instrument(skip(pool, payload))]
async fn add_sample(
    State(pool): State<SqlitePool>,
    payload: Result<Json<AddSampleCommand>, JsonRejection>,
) -> Result<Response, SampleApiError> {
    let Json(command) = payload?;
    let response = super::commands::add::handle(pool, command).await?;

    tracing::info!(
        sample_id = response.sample.id,
        source = %response.source,
        batch_created = response.batch_created,
        "Sample added via API"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Bulk import samples into one batch
///
/// # Request Body
///
/// ```json
/// {
///   "source": "sklearn",
///   "reset": false,
///   "rows": [{"alcohol": 14.23, "malic_acid": 1.71, "color_intensity": 5.64, "target": 0}]
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - All rows stored
/// - `400 Bad Request` - Invalid source or row; nothing stored
#[tracing::instrument(skip(pool, payload))]
async fn import_samples(
    State(pool): State<SqlitePool>,
    payload: Result<Json<ImportSamplesCommand>, JsonRejection>,
) -> Result<Response, SampleApiError> {
    let Json(command) = payload?;
    let response = super::commands::import::handle(pool, command).await?;

    tracing::info!(
        batch_id = response.batch_id,
        source = %response.source,
        inserted = response.inserted,
        "Samples imported via API"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Delete a sample
///
/// - `200 OK` - Sample deleted
/// - `404 Not Found` - No sample with that id
#[tracing::instrument(skip(pool))]
async fn delete_sample(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, SampleApiError> {
    let Path(id) = id?;
    let response = super::commands::delete::handle(pool, DeleteSampleCommand { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool))]
async fn get_sample(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, SampleApiError> {
    let Path(id) = id?;
    let response = super::queries::get::handle(pool, GetSampleQuery { id }).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, query))]
async fn list_samples(
    State(pool): State<SqlitePool>,
    query: Result<Query<ListSamplesQuery>, QueryRejection>,
) -> Result<Response, SampleApiError> {
    let Query(query) = query?;
    let response = super::queries::list::handle(pool, query).await?;

    let meta = json!({ "total": response.items.len() });

    Ok(
        (StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
            .into_response(),
    )
}

#[tracing::instrument(skip(pool))]
async fn summary(State(pool): State<SqlitePool>) -> Result<Response, SampleApiError> {
    let response = super::queries::summary::handle(pool, SummaryQuery::default()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for sample API endpoints
#[derive(Debug)]
enum SampleApiError {
    Body(JsonRejection),
    Path(PathRejection),
    Query(QueryRejection),
    Add(AddSampleError),
    Import(ImportSamplesError),
    Delete(DeleteSampleError),
    Get(GetSampleError),
    List(ListSamplesError),
    Summary(SummaryError),
}

impl From<JsonRejection> for SampleApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<PathRejection> for SampleApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Path(rejection)
    }
}

impl From<QueryRejection> for SampleApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Query(rejection)
    }
}

impl From<AddSampleError> for SampleApiError {
    fn from(err: AddSampleError) -> Self {
        Self::Add(err)
    }
}

impl From<ImportSamplesError> for SampleApiError {
    fn from(err: ImportSamplesError) -> Self {
        Self::Import(err)
    }
}

impl From<DeleteSampleError> for SampleApiError {
    fn from(err: DeleteSampleError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetSampleError> for SampleApiError {
    fn from(err: GetSampleError) -> Self {
        Self::Get(err)
    }
}

impl From<ListSamplesError> for SampleApiError {
    fn from(err: ListSamplesError) -> Self {
        Self::List(err)
    }
}

impl From<SummaryError> for SampleApiError {
    fn from(err: SummaryError) -> Self {
        Self::Summary(err)
    }
}

fn validation_error(message: String) -> Response {
    ErrorResponse::new("VALIDATION_ERROR", message).into_response_with(StatusCode::BAD_REQUEST)
}

fn not_found(message: String) -> Response {
    ErrorResponse::new("NOT_FOUND", message).into_response_with(StatusCode::NOT_FOUND)
}

impl IntoResponse for SampleApiError {
    fn into_response(self) -> Response {
        match self {
            // Malformed requests: a non-numeric feature fails here, before validation
            SampleApiError::Body(rejection) => {
                validation_error(format!("Invalid request body: {}", rejection.body_text()))
            },
            SampleApiError::Path(rejection) => {
                validation_error(format!("Invalid sample id: {}", rejection.body_text()))
            },
            SampleApiError::Query(rejection) => {
                validation_error(format!("Invalid query: {}", rejection.body_text()))
            },

            // Add errors
            SampleApiError::Add(
                err @ (AddSampleError::SourceValidation(_) | AddSampleError::SampleValidation(_)),
            ) => validation_error(err.to_string()),
            SampleApiError::Add(AddSampleError::Database(e)) => {
                database_error_response(&e, "adding sample")
            },

            // Import errors
            SampleApiError::Import(ImportSamplesError::InvalidRow { row, error }) => {
                ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    format!("Row {} is invalid: {}", row, error),
                    json!({ "row": row }),
                )
                .into_response_with(StatusCode::BAD_REQUEST)
            },
            SampleApiError::Import(err @ ImportSamplesError::SourceValidation(_)) => {
                validation_error(err.to_string())
            },
            SampleApiError::Import(ImportSamplesError::Database(e)) => {
                database_error_response(&e, "importing samples")
            },

            // Delete errors
            SampleApiError::Delete(err @ DeleteSampleError::NotFound(_)) => {
                not_found(err.to_string())
            },
            SampleApiError::Delete(DeleteSampleError::Database(e)) => {
                database_error_response(&e, "deleting sample")
            },

            // Get errors
            SampleApiError::Get(err @ GetSampleError::NotFound(_)) => not_found(err.to_string()),
            SampleApiError::Get(GetSampleError::Database(e)) => {
                database_error_response(&e, "fetching sample")
            },

            // List errors
            SampleApiError::List(ListSamplesError::Database(e)) => {
                database_error_response(&e, "listing samples")
            },

            // Summary errors
            SampleApiError::Summary(SummaryError::Database(e)) => {
                database_error_response(&e, "building summary")
            },
        }
    }
}
