pub mod feature_matrix;
pub mod get;
pub mod list;
pub mod summary;

pub use feature_matrix::{FeatureMatrix, FeatureMatrixError, FeatureMatrixQuery};
pub use get::{GetSampleError, GetSampleQuery, GetSampleResponse};
pub use list::{ListSamplesError, ListSamplesQuery, ListSamplesResponse};
pub use summary::{SummaryError, SummaryQuery, SummaryResponse};
