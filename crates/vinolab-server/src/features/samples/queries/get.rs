use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::batches::types::BatchRecord;
use crate::features::samples::types::SampleRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSampleQuery {
    pub id: i64,
}

/// A sample together with the batch it belongs to, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSampleResponse {
    #[serde(flatten)]
    pub sample: SampleRecord,
    pub batch: Option<BatchRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSampleError {
    #[error("Sample {0} not found")]
    NotFound(i64),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GetSampleResponse, GetSampleError>> for GetSampleQuery {}

impl crate::cqrs::middleware::Query for GetSampleQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: GetSampleQuery,
) -> Result<GetSampleResponse, GetSampleError> {
    let sample = sqlx::query_as::<_, SampleRecord>(
        r#"
        SELECT id, alcohol, malic_acid, color_intensity, target, batch_id
        FROM wine
        WHERE id = ?
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetSampleError::NotFound(query.id))?;

    let batch = match sample.batch_id {
        Some(batch_id) => {
            sqlx::query_as::<_, BatchRecord>(
                "SELECT id, source, timestamp FROM import_batches WHERE id = ?",
            )
            .bind(batch_id)
            .fetch_optional(&pool)
            .await?
        },
        None => None,
    };

    Ok(GetSampleResponse { sample, batch })
}
