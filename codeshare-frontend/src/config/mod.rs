use codeshare_core::config::{configuration_directory, load_settings};
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub clipboard: ClipboardSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Origin of the remote file API, e.g. `https://server-m2mq.onrender.com`.
    pub base_url: String,
    #[serde(default = "default_upload_path")]
    pub upload_path: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_listing_path")]
    pub listing_path: String,
    /// Prefix for stored files; the stored file name is appended verbatim.
    #[serde(default = "default_uploads_path")]
    pub uploads_path: String,
    /// Dead-man timeout applied to every request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn default_upload_path() -> String {
    "/api/upload".to_string()
}

fn default_search_path() -> String {
    "/api/files/search".to_string()
}

fn default_listing_path() -> String {
    "/api/search".to_string()
}

fn default_uploads_path() -> String {
    "/uploads/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Identifier searched when the query box is empty.
    #[serde(default = "default_fallback_query")]
    pub fallback_query: String,
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            fallback_query: default_fallback_query(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_fallback_query() -> String {
    "46344".to_string()
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ClipboardSettings {
    /// Command that receives the copied text on stdin. Empty disables copying.
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let configuration_directory = configuration_directory("codeshare-frontend")?;
    load_settings(&configuration_directory, "base.yaml", &["clipboard.command"])
}
