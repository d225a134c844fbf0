//! codeshare-core: Shared infrastructure for the codeshare front-end.
pub mod config;
pub mod observability;

pub use reqwest;
pub use serde;
pub use tracing;
