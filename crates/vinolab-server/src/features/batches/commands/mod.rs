pub mod delete;
pub mod get_or_create;

pub use delete::{DeleteBatchCommand, DeleteBatchError, DeleteBatchResponse};
pub use get_or_create::{
    GetOrCreateBatchCommand, GetOrCreateBatchError, GetOrCreateBatchResponse,
};
