//! HTTP client for the remote file API.

use super::metrics::record_request;
use super::{ApiError, FileApi};
use crate::config::ApiSettings;
use crate::models::{FileRecord, SelectedFile, StoredFile, UploadRequest, UploadResponse};
use async_trait::async_trait;
use codeshare_core::observability::TracedClientExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;

/// Error body sent by the upload endpoint on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

pub struct HttpFileApi {
    client: Client,
    settings: ApiSettings,
}

impl HttpFileApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn observe<T>(operation: &str, started: Instant, result: &Result<T, ApiError>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(ApiError::Server { .. }) => "server_error",
            Err(ApiError::Decode(_)) => "decode_error",
            Err(ApiError::Timeout(_)) => "timeout",
            Err(ApiError::Network(_)) => "network_error",
        };
        record_request(operation, outcome, started.elapsed());
    }
}

fn file_part(file: &SelectedFile) -> Part {
    let part = || Part::bytes(file.data.clone()).file_name(file.file_name.clone());

    match &file.content_type {
        Some(content_type) => part().mime_str(content_type).unwrap_or_else(|_| part()),
        None => part(),
    }
}

#[async_trait]
impl FileApi for HttpFileApi {
    #[tracing::instrument(
        skip(self, request),
        fields(file_name = %request.file.file_name, generated_id = request.generated_id)
    )]
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, ApiError> {
        let url = self.settings.url(&self.settings.upload_path);
        let started = Instant::now();

        let form = Form::new()
            .part("file", file_part(&request.file))
            .text("name", request.submitter_name.clone())
            .text("random_number", request.generated_id.to_string());

        let traced = self.client.traced_post(&url).multipart(form);
        let request_id = traced.request_id().to_string();

        let result = match traced.send().await {
            Ok(response) => self.read_json::<UploadResponse>(response).await,
            Err(e) => Err(ApiError::from_reqwest(e, self.settings.request_timeout())),
        };
        Self::observe("upload", started, &result);

        match &result {
            Ok(body) => tracing::info!(
                request_id = %request_id,
                file_id = body.random_number,
                "File uploaded"
            ),
            Err(e) => tracing::error!(request_id = %request_id, error = %e, "Upload failed"),
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, random_number: &str) -> Result<Vec<FileRecord>, ApiError> {
        let url = self.settings.url(&self.settings.search_path);
        let started = Instant::now();

        let traced = self
            .client
            .traced_get(&url)
            .query(&[("random_number", random_number)]);
        let request_id = traced.request_id().to_string();

        let result = match traced.send().await {
            Ok(response) => self.read_json::<Vec<FileRecord>>(response).await,
            Err(e) => Err(ApiError::from_reqwest(e, self.settings.request_timeout())),
        };
        Self::observe("search", started, &result);

        if let Ok(records) = &result {
            tracing::debug!(request_id = %request_id, hits = records.len(), "Search answered");
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn list_files(&self) -> Result<Vec<StoredFile>, ApiError> {
        let url = self.settings.url(&self.settings.listing_path);
        let started = Instant::now();

        let result = match self.client.traced_get(&url).send().await {
            Ok(response) => self.read_json::<Vec<StoredFile>>(response).await,
            Err(e) => Err(ApiError::from_reqwest(e, self.settings.request_timeout())),
        };
        Self::observe("list_files", started, &result);

        result
    }

    fn file_url(&self, file: &str) -> String {
        format!(
            "{}{}",
            self.settings.url(&self.settings.uploads_path),
            file
        )
    }
}
