pub mod add;
pub mod delete;
pub mod import;
pub mod insert;

pub use add::{AddSampleCommand, AddSampleError, AddSampleResponse, DEFAULT_SOURCE};
pub use delete::{DeleteSampleCommand, DeleteSampleError, DeleteSampleResponse};
pub use import::{ImportSamplesCommand, ImportSamplesError, ImportSamplesResponse};
pub use insert::{InsertSampleCommand, InsertSampleError};
