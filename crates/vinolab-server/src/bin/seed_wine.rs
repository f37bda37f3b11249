//! Seed the sample store from a CSV export of the wine dataset
//!
//! The CSV must carry the headers `alcohol`, `malic_acid`, `color_intensity`
//! and `target`; any other columns are ignored. Every row is loaded into the
//! batch named by `--source` in a single transaction.
//!
//! Usage:
//!   cargo run --bin seed-wine -- --csv data/wine.csv --source sklearn --reset

use anyhow::{bail, Context, Result};
use clap::Parser;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;
use vinolab_common::logging::{init_logging, LogConfig};
use vinolab_server::{
    config::{Config, DEFAULT_DATABASE_URL},
    db,
    features::samples::{
        commands::import::{self, ImportSamplesCommand, ImportSamplesResponse},
        SampleInput,
    },
};

/// Columns that must be present in the CSV header
const REQUIRED_COLUMNS: [&str; 4] = ["alcohol", "malic_acid", "color_intensity", "target"];

#[derive(Debug, Parser)]
#[command(name = "seed-wine", about = "Bulk-load wine samples from a CSV file")]
struct Args {
    /// CSV file to import
    #[arg(long, value_name = "FILE")]
    csv: PathBuf,

    /// Batch source label for the imported rows
    #[arg(long, default_value = "sklearn")]
    source: String,

    /// Delete every existing sample before importing
    #[arg(long)]
    reset: bool,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig::builder()
        .log_file_prefix("seed-wine")
        .filter_directives("vinolab_server=info,sqlx=warn")
        .build()
        .merge_env()?;
    let _log_guard = init_logging(&log_config)?;

    // Parse the whole file before touching the store
    let rows = read_rows(&args.csv)?;
    info!(rows = rows.len(), path = %args.csv.display(), "CSV parsed");

    let mut config = Config::default();
    config.database.url = args.database_url.clone();
    config.validate()?;

    let pool = db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;

    let response = seed(&pool, &args.source, rows, args.reset).await?;
    info!(
        batch_id = response.batch_id,
        inserted = response.inserted,
        removed = response.removed,
        "Seeding finished"
    );

    // Command result for the operator; it goes to stdout even when logs go to a file
    if args.reset {
        println!("Removed {} existing samples", response.removed);
    }
    println!(
        "Imported {} samples into batch {} ({}{})",
        response.inserted,
        response.batch_id,
        response.source,
        if response.batch_created { ", new" } else { "" }
    );

    Ok(())
}

/// Read and check every row of `path`
fn read_rows(path: &Path) -> Result<Vec<SampleInput>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        bail!(
            "CSV file {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        );
    }

    reader
        .deserialize::<SampleInput>()
        .enumerate()
        .map(|(index, record)| {
            // Line 1 is the header
            record.with_context(|| format!("Invalid CSV record on line {}", index + 2))
        })
        .collect()
}

async fn seed(
    pool: &SqlitePool,
    source: &str,
    rows: Vec<SampleInput>,
    reset: bool,
) -> Result<ImportSamplesResponse> {
    let command = ImportSamplesCommand {
        source: source.to_string(),
        rows,
        reset,
    };

    import::handle(pool.clone(), command)
        .await
        .context("Import failed; no samples were written")
}
