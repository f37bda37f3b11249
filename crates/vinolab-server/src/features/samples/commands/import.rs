//! Bulk sample import command
//!
//! Loads many samples into the batch named by `source` in one transaction.
//! With `reset` every existing sample is removed first (batches are kept).
//! All rows are validated up front, so a single bad row means nothing is
//! written.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::batches::commands::get_or_create::get_or_create_in;
use crate::features::samples::types::{insert_row, SampleInput, ValidSample};
use crate::features::shared::validation::{
    validate_source, SampleValidationError, SourceValidationError, MAX_SOURCE_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSamplesCommand {
    pub source: String,
    pub rows: Vec<SampleInput>,
    #[serde(default)]
    pub reset: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSamplesResponse {
    pub batch_id: i64,
    pub source: String,
    pub batch_created: bool,
    pub inserted: usize,
    /// Samples removed by `reset`
    pub removed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportSamplesError {
    #[error("Source validation failed: {0}")]
    SourceValidation(#[from] SourceValidationError),

    /// `row` is the zero-based position in the submitted rows
    #[error("Row {row} is invalid: {error}")]
    InvalidRow {
        row: usize,
        error: SampleValidationError,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ImportSamplesResponse, ImportSamplesError>> for ImportSamplesCommand {}

impl crate::cqrs::middleware::Command for ImportSamplesCommand {}

impl ImportSamplesCommand {
    /// Validate the source and every row, returning them ready to insert
    pub fn validate(&self) -> Result<(String, Vec<ValidSample>), ImportSamplesError> {
        let source = validate_source(&self.source, MAX_SOURCE_LENGTH)?;
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(row, input)| {
                input
                    .validate()
                    .map_err(|error| ImportSamplesError::InvalidRow { row, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok((source, rows))
    }
}

#[tracing::instrument(
    skip(pool, command),
    fields(source = %command.source, rows = command.rows.len(), reset = command.reset)
)]
pub async fn handle(
    pool: SqlitePool,
    command: ImportSamplesCommand,
) -> Result<ImportSamplesResponse, ImportSamplesError> {
    let (source, rows) = command.validate()?;

    let mut tx = crate::db::begin_write(&pool).await?;

    let removed = if command.reset {
        let removed = sqlx::query("DELETE FROM wine")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::info!(removed, "Existing samples removed before import");
        removed
    } else {
        0
    };

    let (batch, batch_created) = get_or_create_in(&mut *tx, &source).await?;

    for sample in &rows {
        insert_row(&mut *tx, sample, Some(batch.id)).await?;
    }

    tx.commit().await?;

    tracing::info!(batch_id = batch.id, inserted = rows.len(), "Samples imported");

    Ok(ImportSamplesResponse {
        batch_id: batch.id,
        source: batch.source,
        batch_created,
        inserted: rows.len(),
        removed,
    })
}
