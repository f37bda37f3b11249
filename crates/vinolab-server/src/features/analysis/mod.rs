//! On-demand classification analysis over the stored samples

pub mod queries;
pub mod routes;

pub use queries::{RunAnalysisError, RunAnalysisQuery};
pub use routes::analysis_routes;
