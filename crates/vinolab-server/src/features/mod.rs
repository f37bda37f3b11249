//! Feature modules implementing the Vinolab API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes, following the CQRS (Command Query Responsibility Segregation)
//! pattern.
//!
//! # Features
//!
//! - **analysis**: On-demand decision-tree report over the stored samples
//! - **batches**: Import batch listing and cascading deletion
//! - **samples**: Sample upload, bulk import, browsing and deletion
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (add, import, delete)
//! - `queries/` - Read operations (get, list, summary)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Row types shared by the slice (if needed)
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate.

pub mod analysis;
pub mod batches;
pub mod samples;
pub mod shared;

use axum::Router;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// SQLite connection pool for the sample store
    pub db: sqlx::SqlitePool,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/summary` - Store summary
/// - `/samples` - Sample operations
/// - `/batches` - Batch operations
/// - `/analysis` - Classification report
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/summary", samples::summary_routes().with_state(state.db.clone()))
        .nest("/samples", samples::samples_routes().with_state(state.db.clone()))
        .nest("/batches", batches::batches_routes().with_state(state.db.clone()))
        .nest("/analysis", analysis::analysis_routes().with_state(state.db.clone()))
}
