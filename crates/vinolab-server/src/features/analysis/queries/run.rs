//! Run the classification analysis over the current store contents

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::analysis::{self, AnalysisError, AnalysisOutcome, AnalysisParams};
use crate::features::samples::queries::feature_matrix::{
    self, FeatureMatrixError, FeatureMatrixQuery,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunAnalysisQuery {}

#[derive(Debug, thiserror::Error)]
pub enum RunAnalysisError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Sample {id} has an invalid target {target}")]
    CorruptSample { id: i64, target: i64 },

    #[error("Analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<FeatureMatrixError> for RunAnalysisError {
    fn from(err: FeatureMatrixError) -> Self {
        match err {
            FeatureMatrixError::InvalidTarget { id, target } => Self::CorruptSample { id, target },
            FeatureMatrixError::Database(e) => Self::Database(e),
        }
    }
}

impl Request<Result<AnalysisOutcome, RunAnalysisError>> for RunAnalysisQuery {}

impl crate::cqrs::middleware::Query for RunAnalysisQuery {}

/// Fetch one snapshot of the feature matrix and analyse it with the fixed
/// parameters on the blocking pool. Nothing is cached; every call recomputes
/// from the store.
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: SqlitePool,
    _query: RunAnalysisQuery,
) -> Result<AnalysisOutcome, RunAnalysisError> {
    let matrix = feature_matrix::handle(pool, FeatureMatrixQuery::default()).await?;
    let span = tracing::Span::current();
    let outcome = tokio::task::spawn_blocking(move || {
        span.in_scope(|| analysis::analyze_with(&matrix.x, &matrix.y, &AnalysisParams::default()))
    })
    .await??;
    Ok(outcome)
}
