//! Add sample command
//!
//! The manual upload flow: a sample arrives with a free-text source label,
//! the batch for that source is found or created, and the sample is stored in
//! it. All fields are validated before anything is written, so a rejected
//! upload never leaves an empty batch behind.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::batches::commands::get_or_create::get_or_create_in;
use crate::features::samples::types::{insert_row, SampleInput, SampleRecord};
use crate::features::shared::validation::{
    validate_source, SampleValidationError, SourceValidationError, MAX_SOURCE_LENGTH,
};

/// Source label used when an upload does not name one
pub const DEFAULT_SOURCE: &str = "-";

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSampleCommand {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(flatten)]
    pub sample: SampleInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddSampleResponse {
    #[serde(flatten)]
    pub sample: SampleRecord,
    pub source: String,
    /// Whether the upload created a new batch
    pub batch_created: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AddSampleError {
    #[error("Source validation failed: {0}")]
    SourceValidation(#[from] SourceValidationError),

    #[error("Sample validation failed: {0}")]
    SampleValidation(#[from] SampleValidationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AddSampleResponse, AddSampleError>> for AddSampleCommand {}

impl crate::cqrs::middleware::Command for AddSampleCommand {}

#[tracing::instrument(skip(pool, command), fields(source = %command.source))]
pub async fn handle(
    pool: SqlitePool,
    command: AddSampleCommand,
) -> Result<AddSampleResponse, AddSampleError> {
    let source = validate_source(&command.source, MAX_SOURCE_LENGTH)?;
    let sample = command.sample.validate()?;

    let mut tx = crate::db::begin_write(&pool).await?;
    let (batch, batch_created) = get_or_create_in(&mut *tx, &source).await?;
    let record = insert_row(&mut *tx, &sample, Some(batch.id)).await?;
    tx.commit().await?;

    tracing::info!(
        sample_id = record.id,
        batch_id = batch.id,
        batch_created,
        "Sample added"
    );

    Ok(AddSampleResponse {
        sample: record,
        source: batch.source,
        batch_created,
    })
}
