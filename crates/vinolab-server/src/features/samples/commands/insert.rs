//! Insert sample command
//!
//! Stores one sample, optionally attached to an existing batch. Every field is
//! validated before the store is touched, and nothing is written on failure.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::samples::types::{insert_row, SampleInput, SampleRecord};
use crate::features::shared::error_helpers::is_foreign_key_violation;
use crate::features::shared::validation::SampleValidationError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertSampleCommand {
    #[serde(flatten)]
    pub sample: SampleInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum InsertSampleError {
    #[error("Sample validation failed: {0}")]
    Validation(#[from] SampleValidationError),

    #[error("Batch {0} not found")]
    BatchNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<SampleRecord, InsertSampleError>> for InsertSampleCommand {}

impl crate::cqrs::middleware::Command for InsertSampleCommand {}

#[tracing::instrument(skip(pool, command), fields(batch_id = ?command.batch_id))]
pub async fn handle(
    pool: SqlitePool,
    command: InsertSampleCommand,
) -> Result<SampleRecord, InsertSampleError> {
    let sample = command.sample.validate()?;

    let mut tx = crate::db::begin_write(&pool).await?;

    if let Some(batch_id) = command.batch_id {
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM import_batches WHERE id = ?")
                .bind(batch_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(InsertSampleError::BatchNotFound(batch_id));
        }
    }

    let record = insert_row(&mut *tx, &sample, command.batch_id)
        .await
        .map_err(|e| match command.batch_id {
            Some(batch_id) if is_foreign_key_violation(&e) => {
                InsertSampleError::BatchNotFound(batch_id)
            },
            _ => InsertSampleError::Database(e),
        })?;

    tx.commit().await?;

    tracing::info!(sample_id = record.id, target = record.target, "Sample inserted");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_pool, TestBatch};

    async fn sample_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM wine")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_handle_inserts_into_batch() {
        let pool = test_pool().await;
        let batch = TestBatch::new("manual").insert(&pool).await.unwrap();

        let record = handle(
            pool.clone(),
            InsertSampleCommand {
                sample: SampleInput::new(13.2, 1.78, 4.38, 0),
                batch_id: Some(batch.id),
            },
        )
        .await
        .unwrap();

        assert!(record.id > 0);
        assert_eq!(record.batch_id, Some(batch.id));
        assert_eq!(record.target, 0);
        assert_eq!(record.alcohol, 13.2);
    }

    #[tokio::test]
    async fn test_handle_without_batch() {
        let pool = test_pool().await;
        let record = handle(
            pool,
            InsertSampleCommand {
                sample: SampleInput::new(12.0, 2.0, 5.0, 2),
                batch_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(record.batch_id, None);
    }

    #[tokio::test]
    async fn test_handle_rejects_bad_target_without_writing() {
        let pool = test_pool().await;
        let result = handle(
            pool.clone(),
            InsertSampleCommand {
                sample: SampleInput::new(12.0, 2.0, 5.0, 3),
                batch_id: None,
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(InsertSampleError::Validation(SampleValidationError::InvalidTarget(3)))
        ));
        assert_eq!(sample_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_handle_rejects_missing_feature() {
        let pool = test_pool().await;
        let mut sample = SampleInput::new(12.0, 2.0, 5.0, 1);
        sample.color_intensity = None;

        let result = handle(pool.clone(), InsertSampleCommand { sample, batch_id: None }).await;
        assert!(matches!(
            result,
            Err(InsertSampleError::Validation(SampleValidationError::MissingFeature {
                feature: "color_intensity"
            }))
        ));
        assert_eq!(sample_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_handle_unknown_batch() {
        let pool = test_pool().await;
        let result = handle(
            pool.clone(),
            InsertSampleCommand {
                sample: SampleInput::new(12.0, 2.0, 5.0, 1),
                batch_id: Some(77),
            },
        )
        .await;

        assert!(matches!(result, Err(InsertSampleError::BatchNotFound(77))));
        assert_eq!(sample_count(&pool).await, 0);
    }
}
