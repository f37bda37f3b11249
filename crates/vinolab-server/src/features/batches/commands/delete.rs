use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBatchCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBatchResponse {
    pub id: i64,
    pub deleted_samples: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteBatchError {
    #[error("Batch {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteBatchResponse, DeleteBatchError>> for DeleteBatchCommand {}

impl crate::cqrs::middleware::Command for DeleteBatchCommand {}

/// Delete a batch together with every sample that references it
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    command: DeleteBatchCommand,
) -> Result<DeleteBatchResponse, DeleteBatchError> {
    let mut tx = crate::db::begin_write(&pool).await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM import_batches WHERE id = ?")
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        return Err(DeleteBatchError::NotFound(command.id));
    }

    // Samples go first so the batch row is never referenced once it is gone.
    let deleted_samples = sqlx::query("DELETE FROM wine WHERE batch_id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM import_batches WHERE id = ?")
        .bind(command.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(batch_id = command.id, deleted_samples, "Batch deleted");

    Ok(DeleteBatchResponse {
        id: command.id,
        deleted_samples,
    })
}
