//! Collaborators of the controllers: the remote file API and the injected
//! clipboard and notifier ports.
//!
//! Each port is a trait so the controllers can run against fakes; the mock
//! implementations live next to the real ones.

pub mod api_client;
pub mod clipboard;
pub mod metrics;
pub mod mock;
pub mod notifier;

use crate::models::{FileRecord, StoredFile, UploadRequest, UploadResponse};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use api_client::HttpFileApi;
pub use clipboard::{ClipboardError, ClipboardWriter, CommandClipboard, DisabledClipboard, MockClipboard};
pub use mock::MockFileApi;
pub use notifier::{ConsoleNotifier, MockNotifier, Notice, NoticeLevel, Notifier};

/// Error type for remote file API calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("Unknown error"))]
    Server { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Connection, DNS and timeout failures, as opposed to an answer from the server.
    pub fn is_network_fault(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }

    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ApiError::Timeout(timeout)
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

/// Contract expected from the remote file API.
#[async_trait]
pub trait FileApi: Send + Sync {
    /// POST one file with its submitter name and generated id.
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, ApiError>;

    /// GET the files stored under an identifier.
    async fn search(&self, random_number: &str) -> Result<Vec<FileRecord>, ApiError>;

    /// GET every stored file.
    async fn list_files(&self) -> Result<Vec<StoredFile>, ApiError>;

    /// Download/view URL for a stored file name.
    fn file_url(&self, file: &str) -> String;
}
