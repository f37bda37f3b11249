use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBatchesQuery {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BatchListItem {
    pub id: i64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub sample_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBatchesResponse {
    pub items: Vec<BatchListItem>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListBatchesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListBatchesResponse, ListBatchesError>> for ListBatchesQuery {}

impl crate::cqrs::middleware::Query for ListBatchesQuery {}

/// All batches, newest first, each with the number of samples it owns
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: ListBatchesQuery,
) -> Result<ListBatchesResponse, ListBatchesError> {
    let items = sqlx::query_as::<_, BatchListItem>(
        r#"
        SELECT b.id, b.source, b.timestamp, COUNT(w.id) AS sample_count
        FROM import_batches b
        LEFT JOIN wine w ON w.batch_id = b.id
        GROUP BY b.id, b.source, b.timestamp
        ORDER BY b.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(ListBatchesResponse { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{test_pool, TestBatch, TestSample};

    #[tokio::test]
    async fn test_handle_lists_newest_first_with_counts() {
        let pool = test_pool().await;
        let older = TestBatch::new("sklearn").insert(&pool).await.unwrap();
        let newer = TestBatch::new("manual").insert(&pool).await.unwrap();
        for target in [0, 1, 1] {
            TestSample::new(target).with_batch(&older).insert(&pool).await.unwrap();
        }

        let response = handle(pool, ListBatchesQuery::default()).await.unwrap();

        let summary: Vec<(i64, &str, i64)> = response
            .items
            .iter()
            .map(|b| (b.id, b.source.as_str(), b.sample_count))
            .collect();
        assert_eq!(summary, vec![(newer.id, "manual", 0), (older.id, "sklearn", 3)]);
    }

    #[tokio::test]
    async fn test_handle_empty_store() {
        let pool = test_pool().await;
        let response = handle(pool, ListBatchesQuery::default()).await.unwrap();
        assert!(response.items.is_empty());
    }
}
