//! Feature matrix snapshot
//!
//! The analysis engine works on plain columns: one `[alcohol, malic_acid,
//! color_intensity]` row and one label per sample, in ascending id order.
//! Both come from a single SELECT, so row `i` of `x` always belongs with
//! `y[i]` even while other requests write to the store.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use vinolab_common::{WineClass, FEATURE_COUNT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureMatrixQuery {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub x: Vec<[f64; FEATURE_COUNT]>,
    pub y: Vec<WineClass>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureMatrixError {
    #[error("Sample {id} has an invalid target {target}")]
    InvalidTarget { id: i64, target: i64 },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<FeatureMatrix, FeatureMatrixError>> for FeatureMatrixQuery {}

impl crate::cqrs::middleware::Query for FeatureMatrixQuery {}

#[derive(Debug, sqlx::FromRow)]
struct MatrixRow {
    id: i64,
    alcohol: f64,
    malic_acid: f64,
    color_intensity: f64,
    target: i64,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: FeatureMatrixQuery,
) -> Result<FeatureMatrix, FeatureMatrixError> {
    let rows = sqlx::query_as::<_, MatrixRow>(
        r#"
        SELECT id, alcohol, malic_acid, color_intensity, target
        FROM wine
        ORDER BY id ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let mut matrix = FeatureMatrix {
        x: Vec::with_capacity(rows.len()),
        y: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        let class = WineClass::try_from(row.target).map_err(|_| {
            FeatureMatrixError::InvalidTarget {
                id: row.id,
                target: row.target,
            }
        })?;
        matrix.x.push([row.alcohol, row.malic_acid, row.color_intensity]);
        matrix.y.push(class);
    }

    tracing::debug!(n_samples = matrix.len(), "Feature matrix fetched");
    Ok(matrix)
}
