//! Scripted file API for testing.

use super::{ApiError, FileApi};
use crate::models::{FileRecord, StoredFile, UploadRequest, UploadResponse};
use crate::utils::lock;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type SearchScript = (Duration, Result<Vec<FileRecord>, ApiError>);

/// In-memory stand-in for the remote API.
///
/// Uploads echo the generated id unless a response is scripted. Searches
/// answer an empty list unless the query is scripted; each scripted query can
/// carry its own latency so out-of-order completion can be staged.
pub struct MockFileApi {
    base_url: String,
    upload_response: Mutex<Option<Result<UploadResponse, ApiError>>>,
    upload_delay: Mutex<Duration>,
    searches: Mutex<HashMap<String, SearchScript>>,
    listing: Mutex<Result<Vec<StoredFile>, ApiError>>,
    upload_calls: Mutex<Vec<UploadRequest>>,
    search_calls: Mutex<Vec<String>>,
    listing_calls: Mutex<usize>,
}

impl MockFileApi {
    pub fn new() -> Self {
        Self {
            base_url: "http://mock.local".to_string(),
            upload_response: Mutex::new(None),
            upload_delay: Mutex::new(Duration::ZERO),
            searches: Mutex::new(HashMap::new()),
            listing: Mutex::new(Ok(Vec::new())),
            upload_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
            listing_calls: Mutex::new(0),
        }
    }

    pub fn respond_to_upload(&self, response: Result<UploadResponse, ApiError>) {
        *lock(&self.upload_response) = Some(response);
    }

    pub fn delay_uploads(&self, delay: Duration) {
        *lock(&self.upload_delay) = delay;
    }

    pub fn respond_to_search(
        &self,
        query: &str,
        delay: Duration,
        response: Result<Vec<FileRecord>, ApiError>,
    ) {
        lock(&self.searches).insert(query.to_string(), (delay, response));
    }

    pub fn respond_to_listing(&self, response: Result<Vec<StoredFile>, ApiError>) {
        *lock(&self.listing) = response;
    }

    /// Upload requests received, oldest first.
    pub fn uploads(&self) -> Vec<UploadRequest> {
        lock(&self.upload_calls).clone()
    }

    /// Search identifiers received, oldest first.
    pub fn searches(&self) -> Vec<String> {
        lock(&self.search_calls).clone()
    }

    pub fn listing_calls(&self) -> usize {
        *lock(&self.listing_calls)
    }
}

impl Default for MockFileApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileApi for MockFileApi {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, ApiError> {
        lock(&self.upload_calls).push(request.clone());

        let delay = *lock(&self.upload_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.upload_response).clone();
        scripted.unwrap_or(Ok(UploadResponse {
            random_number: i64::from(request.generated_id),
        }))
    }

    async fn search(&self, random_number: &str) -> Result<Vec<FileRecord>, ApiError> {
        lock(&self.search_calls).push(random_number.to_string());

        let scripted = lock(&self.searches).get(random_number).cloned();
        let (delay, response) = scripted.unwrap_or((Duration::ZERO, Ok(Vec::new())));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, ApiError> {
        *lock(&self.listing_calls) += 1;
        lock(&self.listing).clone()
    }

    fn file_url(&self, file: &str) -> String {
        format!("{}/uploads/{}", self.base_url, file)
    }
}
