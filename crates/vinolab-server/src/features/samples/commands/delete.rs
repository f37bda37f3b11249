use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSampleCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSampleResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSampleError {
    #[error("Sample {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteSampleResponse, DeleteSampleError>> for DeleteSampleCommand {}

impl crate::cqrs::middleware::Command for DeleteSampleCommand {}

/// Delete one sample; its batch is left in place
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    command: DeleteSampleCommand,
) -> Result<DeleteSampleResponse, DeleteSampleError> {
    let result = sqlx::query_scalar::<_, i64>("DELETE FROM wine WHERE id = ? RETURNING id")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?;

    match result {
        Some(id) => {
            tracing::info!(sample_id = id, "Sample deleted");
            Ok(DeleteSampleResponse { id, deleted: true })
        },
        None => Err(DeleteSampleError::NotFound(command.id)),
    }
}
