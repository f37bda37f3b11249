pub mod list;

pub use list::{BatchListItem, ListBatchesError, ListBatchesQuery, ListBatchesResponse};
