pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    AddSampleCommand, AddSampleError, AddSampleResponse, DeleteSampleCommand, DeleteSampleError,
    DeleteSampleResponse, ImportSamplesCommand, ImportSamplesError, ImportSamplesResponse,
    InsertSampleCommand, InsertSampleError,
};

pub use queries::{
    FeatureMatrix, FeatureMatrixError, FeatureMatrixQuery, GetSampleError, GetSampleQuery,
    GetSampleResponse, ListSamplesError, ListSamplesQuery, ListSamplesResponse, SummaryError,
    SummaryQuery, SummaryResponse,
};

pub use routes::{samples_routes, summary_routes};
pub use types::{SampleInput, SampleRecord};
