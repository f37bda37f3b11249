//! Test helpers and fixtures for database tests
//!
//! Provides utilities to reduce boilerplate in test setup.
//!
//! # Examples
//!
//! ```rust,ignore
//! use vinolab_server::features::shared::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let pool = test_pool().await;
//!
//!     let batch = TestBatch::new("sklearn").insert(&pool).await.unwrap();
//!     TestSample::new(0).with_batch(&batch).insert(&pool).await.unwrap();
//!
//!     // ... test logic ...
//! }
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use vinolab_common::WineClass;

/// Fresh in-memory store with migrations applied
pub async fn test_pool() -> SqlitePool {
    crate::db::create_memory_pool()
        .await
        .expect("in-memory test pool")
}

/// Builder for creating test import batches
#[derive(Debug, Clone)]
pub struct TestBatch {
    pub id: i64,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl TestBatch {
    /// Create a new test batch builder
    pub fn new(source: &str) -> Self {
        Self {
            id: 0,
            source: source.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Insert the batch into the database, filling in its id
    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Self> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO import_batches (source, timestamp) VALUES (?, ?) RETURNING id",
        )
        .bind(&self.source)
        .bind(self.timestamp)
        .fetch_one(pool)
        .await?;

        Ok(Self { id, ..self })
    }
}

/// Builder for creating test samples
#[derive(Debug, Clone)]
pub struct TestSample {
    pub id: i64,
    pub alcohol: f64,
    pub malic_acid: f64,
    pub color_intensity: f64,
    pub target: i64,
    pub batch_id: Option<i64>,
}

impl TestSample {
    /// Create a sample of class `target` with features near its class centre
    pub fn new(target: i64) -> Self {
        let offset = target as f64;
        Self {
            id: 0,
            alcohol: 12.0 + offset,
            malic_acid: 2.0,
            color_intensity: 3.0 + 2.0 * offset,
            target,
            batch_id: None,
        }
    }

    /// Set all three feature values
    pub fn with_features(mut self, alcohol: f64, malic_acid: f64, color_intensity: f64) -> Self {
        self.alcohol = alcohol;
        self.malic_acid = malic_acid;
        self.color_intensity = color_intensity;
        self
    }

    /// Attach the sample to a batch
    pub fn with_batch(mut self, batch: &TestBatch) -> Self {
        self.batch_id = Some(batch.id);
        self
    }

    /// Insert the sample into the database, filling in its id
    pub async fn insert(self, pool: &SqlitePool) -> sqlx::Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO wine (alcohol, malic_acid, color_intensity, target, batch_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(self.alcohol)
        .bind(self.malic_acid)
        .bind(self.color_intensity)
        .bind(self.target)
        .bind(self.batch_id)
        .fetch_one(pool)
        .await?;

        Ok(Self { id, ..self })
    }
}

/// Insert `per_class` samples of every class into `batch`, with small jitter
/// so that feature values differ within a class
pub async fn seed_balanced(
    pool: &SqlitePool,
    batch: &TestBatch,
    per_class: usize,
) -> sqlx::Result<Vec<TestSample>> {
    let mut samples = Vec::with_capacity(per_class * WineClass::COUNT);
    for class in WineClass::ALL {
        for i in 0..per_class {
            let jitter = i as f64 * 0.01;
            let base = TestSample::new(i64::from(class));
            let sample = base
                .clone()
                .with_features(
                    base.alcohol + jitter,
                    base.malic_acid - jitter,
                    base.color_intensity + jitter,
                )
                .with_batch(batch)
                .insert(pool)
                .await?;
            samples.push(sample);
        }
    }
    Ok(samples)
}
