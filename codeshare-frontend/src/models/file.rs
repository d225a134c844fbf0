use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit as returned by the search endpoint. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Stored file name; also the path segment under the uploads prefix.
    pub file: String,
    /// Uploader name.
    pub name: String,
    /// Upload time. Absent when the server sent nothing usable.
    #[serde(
        default,
        deserialize_with = "crate::models::timestamp::deserialize_lenient"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(
        default,
        alias = "type",
        alias = "mimetype",
        alias = "mimeType",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_type: Option<String>,
}

impl FileRecord {
    pub fn extension(&self) -> String {
        extension_for(self.mime_type.as_deref())
    }
}

/// One row of the full listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub filename: String,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(deserialize_with = "crate::models::timestamp::deserialize")]
    pub modified: DateTime<Utc>,
    pub file: String,
}

/// Short type label for a MIME type, e.g. `application/pdf` -> `pdf`.
pub fn extension_for(mime_type: Option<&str>) -> String {
    let Some(mime_type) = mime_type else {
        return "unknown".to_string();
    };

    match mime_type {
        "application/pdf" => "pdf".to_string(),
        "application/msword" => "doc".to_string(),
        "application/vnd.ms-excel" => "xls".to_string(),
        "image/png" => "png".to_string(),
        "image/jpeg" => "jpg".to_string(),
        other => match other.split_once('/') {
            Some((_, subtype)) if !subtype.is_empty() => subtype.to_string(),
            _ => other.to_string(),
        },
    }
}
