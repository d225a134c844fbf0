use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use validator::{Validate, ValidationError, ValidationErrors};

/// A file picked by the user, held in memory until it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk. No type or size checks are applied.
    ///
    /// The content type comes from the extension, or from the leading bytes
    /// when the extension is unknown; it stays unset if neither helps.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let content_type = mime_guess::from_path(path)
            .first_raw()
            .or_else(|| infer::get(&data).map(|kind| kind.mime_type()))
            .map(str::to_string);

        Ok(Self {
            file_name,
            content_type,
            data,
        })
    }
}

/// Form state owned by the upload controller.
#[derive(Debug, Clone, Default, Validate)]
pub struct UploadForm {
    #[validate(required(message = "Please select a file."))]
    pub file: Option<SelectedFile>,
    #[validate(length(min = 1, message = "Please enter your name."))]
    pub submitter_name: String,
}

impl UploadForm {
    /// Display name of the selected file, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|file| file.file_name.as_str())
    }

    /// Validate the form and snapshot it into a request for one attempt.
    pub fn to_request(&self, generated_id: u32) -> Result<UploadRequest, ValidationErrors> {
        self.validate()?;

        match &self.file {
            Some(file) => Ok(UploadRequest {
                file: file.clone(),
                submitter_name: self.submitter_name.clone(),
                generated_id,
            }),
            None => {
                let mut errors = ValidationErrors::new();
                errors.add("file", ValidationError::new("required"));
                Err(errors)
            }
        }
    }

    pub fn clear(&mut self) {
        self.file = None;
        self.submitter_name.clear();
    }
}

/// Everything sent for a single upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub submitter_name: String,
    pub generated_id: u32,
}

/// Body of a successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier issued by the server; it may echo or replace the one sent.
    #[serde(deserialize_with = "number_or_string")]
    pub random_number: i64,
}

/// What the caller is told after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_id: i64,
    pub file_name: String,
    pub copied_to_clipboard: bool,
}

impl UploadReceipt {
    pub fn message(&self) -> String {
        let mut message = format!(
            "File \"{}\" uploaded successfully! Your number is: {}",
            self.file_name, self.file_id
        );
        if self.copied_to_clipboard {
            message.push_str(" (Copied to clipboard)");
        }
        message
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

fn number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("not an integer: {}", text))),
    }
}
