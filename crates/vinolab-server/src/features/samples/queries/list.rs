use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::samples::types::SampleRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSamplesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSamplesResponse {
    pub items: Vec<SampleRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListSamplesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListSamplesResponse, ListSamplesError>> for ListSamplesQuery {}

impl crate::cqrs::middleware::Query for ListSamplesQuery {}

/// Samples newest first, optionally restricted to one batch
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    query: ListSamplesQuery,
) -> Result<ListSamplesResponse, ListSamplesError> {
    let items = sqlx::query_as::<_, SampleRecord>(
        r#"
        SELECT id, alcohol, malic_acid, color_intensity, target, batch_id
        FROM wine
        WHERE (? IS NULL OR batch_id = ?)
        ORDER BY id DESC
        "#,
    )
    .bind(query.batch_id)
    .bind(query.batch_id)
    .fetch_all(&pool)
    .await?;

    tracing::debug!(count = items.len(), "Samples listed");
    Ok(ListSamplesResponse { items })
}
