//! Full file listing for the admin view. Fetched on demand; a failed refresh
//! keeps the previous rows.

use crate::models::StoredFile;
use crate::services::{ApiError, FileApi};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    pub files: Vec<StoredFile>,
    pub loaded: bool,
    pub last_error: Option<String>,
}

pub struct FileListing {
    api: Arc<dyn FileApi>,
    request_timeout: Duration,
    state: watch::Sender<ListingState>,
}

impl FileListing {
    pub fn new(api: Arc<dyn FileApi>, request_timeout: Duration) -> Self {
        let (state, _) = watch::channel(ListingState::default());
        Self {
            api,
            request_timeout,
            state,
        }
    }

    pub fn state(&self) -> ListingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.state.subscribe()
    }

    /// Reload the listing and return how many files it holds.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let result = match tokio::time::timeout(self.request_timeout, self.api.list_files()).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.request_timeout)),
        };

        match result {
            Ok(files) => {
                let count = files.len();
                self.state.send_replace(ListingState {
                    files,
                    loaded: true,
                    last_error: None,
                });
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching file listing");
                self.state
                    .send_modify(|state| state.last_error = Some(e.to_string()));
                Err(e)
            }
        }
    }
}
