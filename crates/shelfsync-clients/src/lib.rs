pub mod catalog;
pub mod error;
pub mod tracker;
pub mod traits;

pub use catalog::CatalogHttpClient;
pub use error::ClientError;
pub use tracker::TrackerHttpClient;
pub use traits::{CatalogClient, ListFetch, TrackerClient};
