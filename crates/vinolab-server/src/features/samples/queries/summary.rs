//! Store summary for the landing page
//!
//! Reports whether the database answers, how many samples and batches it
//! holds, and the most recently added sample with its batch. A store that
//! cannot be reached is reported through `database_ok` rather than as an
//! error so the page can still render.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::batches::types::BatchRecord;
use crate::features::samples::types::SampleRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub database_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_error: Option<String>,
    pub count_samples: i64,
    pub count_batches: i64,
    pub latest_sample: Option<SampleRecord>,
    pub latest_batch: Option<BatchRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<SummaryResponse, SummaryError>> for SummaryQuery {}

impl crate::cqrs::middleware::Query for SummaryQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: SummaryQuery,
) -> Result<SummaryResponse, SummaryError> {
    if let Err(e) = crate::db::health_check(&pool).await {
        tracing::warn!(error = %e, "Store unreachable while building summary");
        return Ok(SummaryResponse {
            database_ok: false,
            database_error: Some(e.to_string()),
            ..SummaryResponse::default()
        });
    }

    let count_samples: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wine")
        .fetch_one(&pool)
        .await?;
    let count_batches: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM import_batches")
        .fetch_one(&pool)
        .await?;

    let latest_sample = sqlx::query_as::<_, SampleRecord>(
        r#"
        SELECT id, alcohol, malic_acid, color_intensity, target, batch_id
        FROM wine
        ORDER BY id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(&pool)
    .await?;

    let latest_batch = match latest_sample.as_ref().and_then(|s| s.batch_id) {
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

    Ok(SummaryResponse {
        database_ok: true,
        database_error: None,
        count_samples,
        count_batches,
        latest_sample,
        latest_batch,
    })
}
