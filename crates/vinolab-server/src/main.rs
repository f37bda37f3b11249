//! Vinolab Server - Main entry point

use anyhow::Result;
use tracing::info;
use vinolab_common::logging::{init_logging, LogConfig};

use vinolab_server::{api, config::Config, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with configuration from environment
    let log_config = LogConfig::builder()
        .log_file_prefix("vinolab-server")
        .filter_directives("vinolab_server=debug,tower_http=debug,sqlx=info")
        .build();

    // Merge with environment variables (they take precedence)
    let log_config = log_config.merge_env()?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = init_logging(&log_config)?;

    info!("Starting Vinolab Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Initialize database connection pool
    let db_pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    db::run_migrations(&db_pool).await?;

    api::serve(config, db_pool).await
}
