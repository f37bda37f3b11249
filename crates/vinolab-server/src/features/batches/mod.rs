pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    DeleteBatchCommand, DeleteBatchError, DeleteBatchResponse, GetOrCreateBatchCommand,
    GetOrCreateBatchError, GetOrCreateBatchResponse,
};

pub use queries::{BatchListItem, ListBatchesError, ListBatchesQuery, ListBatchesResponse};

pub use routes::batches_routes;
pub use types::BatchRecord;
