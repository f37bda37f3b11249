//! Get-or-create import batch command
//!
//! Batches are never created on their own by a user; they appear the first
//! time a sample or an import names a new source. When several batches share a
//! source (the column is not unique) the most recent one is reused.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

use crate::features::batches::types::BatchRecord;
use crate::features::shared::validation::{
    validate_source, SourceValidationError, MAX_SOURCE_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOrCreateBatchCommand {
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOrCreateBatchResponse {
    #[serde(flatten)]
    pub batch: BatchRecord,
    /// Whether this call inserted the batch
    pub created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GetOrCreateBatchError {
    #[error("Source validation failed: {0}")]
    SourceValidation(#[from] SourceValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GetOrCreateBatchResponse, GetOrCreateBatchError>> for GetOrCreateBatchCommand {}

impl crate::cqrs::middleware::Command for GetOrCreateBatchCommand {}

impl GetOrCreateBatchCommand {
    /// Returns the trimmed source
    pub fn validate(&self) -> Result<String, GetOrCreateBatchError> {
        Ok(validate_source(&self.source, MAX_SOURCE_LENGTH)?)
    }
}

/// Look up the newest batch for an already validated `source`, inserting one
/// if there is none. Runs on the caller's connection so it can share a
/// transaction with the writes that follow.
pub(crate) async fn get_or_create_in(
    conn: &mut SqliteConnection,
    source: &str,
) -> Result<(BatchRecord, bool), sqlx::Error> {
    let existing = sqlx::query_as::<_, BatchRecord>(
        r#"
        SELECT id, source, timestamp
        FROM import_batches
        WHERE source = ?
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .bind(source)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(batch) = existing {
        tracing::debug!(batch_id = batch.id, "Reusing existing batch");
        return Ok((batch, false));
    }

    let batch = sqlx::query_as::<_, BatchRecord>(
        r#"
        INSERT INTO import_batches (source, timestamp)
        VALUES (?, ?)
        RETURNING id, source, timestamp
        "#,
    )
    .bind(source)
    .bind(chrono::Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    tracing::info!(batch_id = batch.id, source = %batch.source, "Import batch created");
    Ok((batch, true))
}

/// Handler for the get-or-create batch command
///
/// The batch is committed before returning, so its id is durable before any
/// sample refers to it.
#[tracing::instrument(skip(pool, command), fields(source = %command.source))]
pub async fn handle(
    pool: SqlitePool,
    command: GetOrCreateBatchCommand,
) -> Result<GetOrCreateBatchResponse, GetOrCreateBatchError> {
    let source = command.validate()?;

    let mut tx = crate::db::begin_write(&pool).await?;
    let (batch, created) = get_or_create_in(&mut *tx, &source).await?;
    tx.commit().await?;

    Ok(GetOrCreateBatchResponse { batch, created })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_pool, TestBatch};

    #[test]
    fn test_validation_trims_source() {
        let cmd = GetOrCreateBatchCommand {
            source: "  manual ".to_string(),
        };
        assert_eq!(cmd.validate().unwrap(), "manual");
    }

    #[test]
    fn test_validation_empty_source() {
        let cmd = GetOrCreateBatchCommand {
            source: "   ".to_string(),
        };
        assert!(matches!(
            cmd.validate(),
            Err(GetOrCreateBatchError::SourceValidation(SourceValidationError::Required))
        ));
    }

    #[tokio::test]
    async fn test_handle_is_idempotent_per_source() {
        let pool = test_pool().await;

        let first = handle(
            pool.clone(),
            GetOrCreateBatchCommand {
                source: "sklearn".to_string(),
            },
        )
        .await
        .unwrap();
        let second = handle(
            pool.clone(),
            GetOrCreateBatchCommand {
                source: " sklearn ".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.batch.id, second.batch.id);
        assert_eq!(second.batch.source, "sklearn");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM import_batches")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_handle_reuses_most_recent_duplicate() {
        let pool = test_pool().await;
        TestBatch::new("dup").insert(&pool).await.unwrap();
        let newest = TestBatch::new("dup").insert(&pool).await.unwrap();

        let response = handle(
            pool.clone(),
            GetOrCreateBatchCommand {
                source: "dup".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(!response.created);
        assert_eq!(response.batch.id, newest.id);
    }

    #[tokio::test]
    async fn test_handle_rejects_blank_source_without_writing() {
        let pool = test_pool().await;
        let result = handle(
            pool.clone(),
            GetOrCreateBatchCommand {
                source: "".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(GetOrCreateBatchError::SourceValidation(_))));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM import_batches")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
