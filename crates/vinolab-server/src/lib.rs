//! Vinolab Server Library
//!
//! HTTP server for storing wine samples and classifying them with a decision tree.
//!
//! # Overview
//!
//! The Vinolab server keeps a small SQLite store of labelled wine samples and
//! serves an on-demand classification report over them:
//!
//! - **API Endpoints**: RESTful API for samples, import batches and analysis
//! - **Database Management**: SQLite integration with SQLx
//! - **Analysis Engine**: Stratified split, CART tree, accuracy and importances
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request logging
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** architecture:
//!
//! - **Commands** (Write Operations): add, import and delete operations that modify the store
//!   - Executed via HTTP POST and DELETE methods
//!   - Each runs inside a single transaction
//!
//! - **Queries** (Read Operations): retrieve operations that read the store
//!   - Executed via HTTP GET method
//!   - The analysis report is a query: it never writes
//!
//! ## Framework Stack
//!
//! - **Axum**: Modern, ergonomic web framework
//! - **SQLx**: Async SQLite access with embedded migrations
//! - **Tower**: Middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use vinolab_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     db::run_migrations(&pool).await?;
//!     api::serve(config, pool).await?;
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, ServerResult};
