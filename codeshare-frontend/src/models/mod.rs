pub mod file;
pub mod timestamp;
pub mod upload;

pub use file::{FileRecord, StoredFile};
pub use upload::{SelectedFile, UploadForm, UploadReceipt, UploadRequest, UploadResponse};
