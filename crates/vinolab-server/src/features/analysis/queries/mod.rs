pub mod run;

pub use run::{RunAnalysisError, RunAnalysisQuery};
