//! Front-end state holders. Each controller owns its state privately and
//! publishes it through a `tokio::sync::watch` channel for the view layer.

pub mod listing;
pub mod search;
pub mod upload;

pub use listing::{FileListing, ListingState};
pub use search::{effective_query, FetchOutcome, SearchController, SearchState};
pub use upload::{UploadController, UploadError, UploadStatus};
