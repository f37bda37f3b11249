//! Database connection management
//!
//! The store is a SQLite database accessed through an explicitly constructed
//! [`SqlitePool`]. The pool is created once at startup and handed to every
//! command and query handler.

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
    Sqlite, Transaction,
};
use std::{str::FromStr, time::Duration};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Embedded schema migrations for `import_batches` and `wine`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT_SECS: u64 = 5;

/// Primary result codes `SQLITE_BUSY` and `SQLITE_LOCKED`
const LOCK_RESULT_CODES: [i32; 2] = [5, 6];

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

fn connect_options(url: &str) -> DbResult<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| DbError::Config(format!("invalid database URL '{}': {}", url, e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

    // WAL lets readers proceed while a writer holds the lock; in-memory
    // databases do not support it.
    if url.contains(":memory:") || url.contains("mode=memory") {
        Ok(options)
    } else {
        Ok(options.journal_mode(SqliteJournalMode::Wal))
    }
}

/// Create the connection pool described by `config`
pub async fn create_pool(config: &DatabaseConfig) -> DbResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect_with(connect_options(&config.url)?)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Create a single-connection in-memory pool with the schema applied
///
/// One connection only: every new SQLite in-memory connection would otherwise
/// open its own empty database.
pub async fn create_memory_pool() -> DbResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:")?)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply any pending schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Round-trip a trivial query to confirm the store is reachable
pub async fn health_check(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

/// Begin a transaction that holds the write lock from its first statement
///
/// Every read-then-write store operation starts here. A deferred transaction
/// that upgrades to a writer after another connection committed fails with
/// `SQLITE_BUSY` at once; `BEGIN IMMEDIATE` waits on the busy timeout instead.
pub async fn begin_write(pool: &SqlitePool) -> sqlx::Result<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Whether a sqlx error means the store itself is unreachable rather than a
/// problem with one statement
pub fn is_unavailable(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Tls(_)
    ) || is_lock_contention(error)
}

/// The database stayed locked by another connection past the busy timeout
fn is_lock_contention(error: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_error) = error else {
        return false;
    };
    db_error
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| LOCK_RESULT_CODES.contains(&(code & 0xff)))
}
