//! Vinolab Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared domain types, error handling and logging for the Vinolab workspace.
//!
//! # Overview
//!
//! - **Types**: the three-class wine label and the feature vector stored per sample
//! - **Error Handling**: domain error type and result alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use vinolab_common::types::{Features, WineClass};
//!
//! let class = WineClass::try_from(2_i64)?;
//! let features = Features::new(13.2, 1.78, 4.38)?;
//! assert_eq!(class.label(), 2);
//! assert_eq!(features.to_array()[0], 13.2);
//! # Ok::<(), vinolab_common::VinolabError>(())
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VinolabError};
pub use types::{Features, WineClass, FEATURE_COUNT, FEATURE_NAMES};
