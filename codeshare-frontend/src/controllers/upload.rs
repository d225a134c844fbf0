//! Upload form controller.
//!
//! `idle -> loading -> {success, error} -> idle`. Only one upload may be in
//! flight; a second `submit` while loading is rejected without a request.

use crate::models::{SelectedFile, UploadForm, UploadReceipt, UploadRequest, UploadResponse};
use crate::services::{ApiError, ClipboardWriter, FileApi, Notice, Notifier};
use crate::utils::{generate_upload_id, lock};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use validator::ValidationErrors;

pub const VALIDATION_MESSAGE: &str = "Please select a file and enter your name.";
pub const NETWORK_FAILURE_MESSAGE: &str = "Error uploading file.";

/// Upper bound on the clipboard write; a hung helper must not hold the form.
const CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Loading,
    Success(UploadReceipt),
    Error(String),
}

impl UploadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadStatus::Loading)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Success(_) | UploadStatus::Error(_))
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select a file and enter your name.")]
    Validation(#[from] ValidationErrors),

    #[error("An upload is already in progress")]
    InFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct UploadController {
    api: Arc<dyn FileApi>,
    clipboard: Arc<dyn ClipboardWriter>,
    notifier: Arc<dyn Notifier>,
    request_timeout: Duration,
    form: Mutex<UploadForm>,
    status: watch::Sender<UploadStatus>,
}

/// Puts the status back to idle if a submission is abandoned mid-flight.
struct LoadingGuard<'a> {
    status: &'a watch::Sender<UploadStatus>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|status| {
            if status.is_loading() {
                *status = UploadStatus::Idle;
                true
            } else {
                false
            }
        });
    }
}

impl UploadController {
    pub fn new(
        api: Arc<dyn FileApi>,
        clipboard: Arc<dyn ClipboardWriter>,
        notifier: Arc<dyn Notifier>,
        request_timeout: Duration,
    ) -> Self {
        let (status, _) = watch::channel(UploadStatus::Idle);
        Self {
            api,
            clipboard,
            notifier,
            request_timeout,
            form: Mutex::new(UploadForm::default()),
            status,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    /// Snapshot of the form for display.
    pub fn form(&self) -> UploadForm {
        lock(&self.form).clone()
    }

    /// Record the chosen file, or clear it with `None`.
    pub fn select_file(&self, file: Option<SelectedFile>) -> Result<(), UploadError> {
        self.edit(|form| form.file = file)
    }

    pub fn set_submitter_name(&self, name: impl Into<String>) -> Result<(), UploadError> {
        let name = name.into();
        self.edit(|form| form.submitter_name = name)
    }

    /// The form is locked while a submission is loading; a successful upload
    /// clears exactly what was submitted.
    fn edit(&self, apply: impl FnOnce(&mut UploadForm)) -> Result<(), UploadError> {
        {
            let mut form = lock(&self.form);
            if self.status.borrow().is_loading() {
                return Err(UploadError::InFlight);
            }
            apply(&mut form);
        }
        self.dismiss();
        Ok(())
    }

    /// Acknowledge a success or error and return to idle.
    pub fn dismiss(&self) {
        self.status.send_if_modified(|status| {
            if status.is_terminal() {
                *status = UploadStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    pub async fn submit(&self) -> Result<UploadReceipt, UploadError> {
        let request = self.begin()?;
        let _guard = LoadingGuard {
            status: &self.status,
        };

        tracing::info!(
            file_name = %request.file.file_name,
            generated_id = request.generated_id,
            "Submitting upload"
        );

        let outcome = match tokio::time::timeout(self.request_timeout, self.api.upload(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(self.request_timeout)),
        };

        match outcome {
            Ok(response) => Ok(self.succeed(&request, response).await),
            Err(error) => {
                self.fail(&error);
                Err(UploadError::Api(error))
            }
        }
    }

    /// Validate and move to `loading` atomically with respect to other submits.
    fn begin(&self) -> Result<UploadRequest, UploadError> {
        let form = lock(&self.form);

        if self.status.borrow().is_loading() {
            tracing::warn!("Upload already in progress, submission rejected");
            return Err(UploadError::InFlight);
        }

        match form.to_request(generate_upload_id()) {
            Ok(request) => {
                self.status.send_replace(UploadStatus::Loading);
                Ok(request)
            }
            Err(errors) => {
                tracing::info!(errors = %errors, "Upload form is incomplete");
                self.notifier.notify(Notice::error(VALIDATION_MESSAGE));
                Err(UploadError::Validation(errors))
            }
        }
    }

    async fn succeed(&self, request: &UploadRequest, response: UploadResponse) -> UploadReceipt {
        let file_id = response.random_number;

        let copied_to_clipboard = match tokio::time::timeout(
            CLIPBOARD_TIMEOUT,
            self.clipboard.write_text(&file_id.to_string()),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::warn!(file_id, error = %e, "Could not copy file id to clipboard");
                false
            }
            Err(_) => {
                tracing::warn!(file_id, "Clipboard write timed out");
                false
            }
        };

        let receipt = UploadReceipt {
            file_id,
            file_name: request.file.file_name.clone(),
            copied_to_clipboard,
        };

        lock(&self.form).clear();
        self.status.send_replace(UploadStatus::Success(receipt.clone()));
        self.notifier.notify(Notice::success(receipt.message()));

        receipt
    }

    fn fail(&self, error: &ApiError) {
        let notice = match error {
            ApiError::Server { message, .. } => Notice::failed(format!(
                "Failed to upload file: {}",
                message.as_deref().unwrap_or("Unknown error")
            )),
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::Decode(_) => {
                Notice::error(NETWORK_FAILURE_MESSAGE)
            }
        };

        tracing::error!(error = %error, "Upload failed");
        self.status.send_replace(UploadStatus::Error(notice.text.clone()));
        self.notifier.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockClipboard, MockFileApi, MockNotifier, NoticeLevel};

    struct Harness {
        api: Arc<MockFileApi>,
        clipboard: Arc<MockClipboard>,
        notifier: Arc<MockNotifier>,
        controller: Arc<UploadController>,
    }

    fn harness_with(clipboard: MockClipboard) -> Harness {
        let api = Arc::new(MockFileApi::new());
        let clipboard = Arc::new(clipboard);
        let notifier = Arc::new(MockNotifier::new());
        let controller = Arc::new(UploadController::new(
            api.clone(),
            clipboard.clone(),
            notifier.clone(),
            Duration::from_secs(30),
        ));
        Harness {
            api,
            clipboard,
            notifier,
            controller,
        }
    }

    fn harness() -> Harness {
        harness_with(MockClipboard::new())
    }

    fn fill(controller: &UploadController) {
        controller
            .select_file(Some(SelectedFile::new("report.pdf", b"%PDF".to_vec())))
            .unwrap();
        controller.set_submitter_name("Alice").unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_rejected_without_request() {
        let h = harness();
        h.controller.set_submitter_name("Alice").unwrap();

        let err = h.controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Validation(_)));
        assert!(h.api.uploads().is_empty());
        assert_eq!(h.controller.status(), UploadStatus::Idle);
        assert_eq!(h.notifier.last().unwrap().text, VALIDATION_MESSAGE);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_request() {
        let h = harness();
        h.controller
            .select_file(Some(SelectedFile::new("report.pdf", vec![1])))
            .unwrap();

        let err = h.controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Validation(_)));
        assert!(h.api.uploads().is_empty());
    }

    #[tokio::test]
    async fn success_copies_id_and_clears_form() {
        let h = harness();
        h.api.respond_to_upload(Ok(UploadResponse {
            random_number: 54321,
        }));
        fill(&h.controller);

        let receipt = h.controller.submit().await.unwrap();

        assert_eq!(receipt.file_id, 54321);
        assert_eq!(receipt.file_name, "report.pdf");
        assert!(receipt.copied_to_clipboard);
        assert_eq!(h.clipboard.writes(), vec!["54321"]);
        assert_eq!(h.api.uploads().len(), 1);

        let form = h.controller.form();
        assert!(form.file.is_none());
        assert!(form.submitter_name.is_empty());
        assert_eq!(h.controller.status(), UploadStatus::Success(receipt));

        let notice = h.notifier.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.text.contains("54321"));
    }

    #[tokio::test]
    async fn request_carries_form_fields_and_generated_id() {
        let h = harness();
        fill(&h.controller);

        h.controller.submit().await.unwrap();

        let sent = &h.api.uploads()[0];
        assert_eq!(sent.submitter_name, "Alice");
        assert_eq!(sent.file.file_name, "report.pdf");
        assert!(crate::utils::UPLOAD_ID_RANGE.contains(&sent.generated_id));
    }

    #[tokio::test]
    async fn clipboard_failure_does_not_mask_success() {
        let h = harness_with(MockClipboard::failing());
        fill(&h.controller);

        let receipt = h.controller.submit().await.unwrap();

        assert!(!receipt.copied_to_clipboard);
        assert!(matches!(h.controller.status(), UploadStatus::Success(_)));
        assert!(!h.notifier.last().unwrap().text.contains("Copied"));
    }

    #[tokio::test]
    async fn server_error_surfaces_message_and_keeps_form() {
        let h = harness();
        h.api.respond_to_upload(Err(ApiError::Server {
            status: 413,
            message: Some("File too large".to_string()),
        }));
        fill(&h.controller);

        let err = h.controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Api(ApiError::Server { .. })));
        assert_eq!(
            h.controller.status(),
            UploadStatus::Error("Failed to upload file: File too large".to_string())
        );
        assert_eq!(h.notifier.last().unwrap().title, "Failed!");
        assert_eq!(h.controller.form().submitter_name, "Alice");
        assert!(h.clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn server_error_without_body_uses_generic_message() {
        let h = harness();
        h.api.respond_to_upload(Err(ApiError::Server {
            status: 500,
            message: None,
        }));
        fill(&h.controller);

        h.controller.submit().await.unwrap_err();

        assert_eq!(
            h.notifier.last().unwrap().text,
            "Failed to upload file: Unknown error"
        );
    }

    #[tokio::test]
    async fn network_fault_reports_generic_error() {
        let h = harness();
        h.api
            .respond_to_upload(Err(ApiError::Network("connection refused".to_string())));
        fill(&h.controller);

        h.controller.submit().await.unwrap_err();

        assert_eq!(
            h.controller.status(),
            UploadStatus::Error(NETWORK_FAILURE_MESSAGE.to_string())
        );
        assert_eq!(h.api.uploads().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_submit_while_loading_is_rejected() {
        let h = harness();
        h.api.delay_uploads(Duration::from_secs(2));
        fill(&h.controller);

        let first = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(h.controller.status().is_loading());

        let second = h.controller.submit().await;
        assert!(matches!(second, Err(UploadError::InFlight)));

        assert!(first.await.unwrap().is_ok());
        assert_eq!(h.api.uploads().len(), 1);
        assert!(!h.controller.status().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn form_is_locked_while_loading() {
        let h = harness();
        h.api.delay_uploads(Duration::from_secs(2));
        fill(&h.controller);

        let upload = {
            let controller = h.controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(h.controller.status().is_loading());

        assert!(matches!(
            h.controller.set_submitter_name("Bob"),
            Err(UploadError::InFlight)
        ));
        assert!(matches!(
            h.controller.select_file(Some(SelectedFile::new("other.txt", vec![2]))),
            Err(UploadError::InFlight)
        ));
        assert_eq!(h.controller.form().submitter_name, "Alice");

        assert!(upload.await.unwrap().is_ok());
        assert!(h.controller.form().file.is_none());

        h.controller.set_submitter_name("Bob").unwrap();
        assert_eq!(h.controller.form().submitter_name, "Bob");
        assert_eq!(h.controller.status(), UploadStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn unresolved_upload_times_out() {
        let h = harness();
        h.api.delay_uploads(Duration::from_secs(120));
        fill(&h.controller);

        let err = h.controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Api(ApiError::Timeout(_))));
        assert_eq!(
            h.controller.status(),
            UploadStatus::Error(NETWORK_FAILURE_MESSAGE.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_submit_clears_loading() {
        let h = harness();
        h.api.delay_uploads(Duration::from_secs(10));
        fill(&h.controller);

        let _ = tokio::time::timeout(Duration::from_millis(50), h.controller.submit()).await;

        assert_eq!(h.controller.status(), UploadStatus::Idle);
    }

    #[tokio::test]
    async fn editing_after_a_result_returns_to_idle() {
        let h = harness();
        fill(&h.controller);
        h.controller.submit().await.unwrap();
        assert!(matches!(h.controller.status(), UploadStatus::Success(_)));

        h.controller.set_submitter_name("Bob").unwrap();
        assert_eq!(h.controller.status(), UploadStatus::Idle);
    }

    #[tokio::test]
    async fn each_valid_submit_makes_exactly_one_request_and_one_transition() {
        let h = harness();
        let mut status = h.controller.subscribe();

        for attempt in 1..=5 {
            fill(&h.controller);
            let result = h.controller.submit().await;
            assert!(result.is_ok());
            assert_eq!(h.api.uploads().len(), attempt);
            assert!(status.has_changed().unwrap());
            assert!(matches!(*status.borrow_and_update(), UploadStatus::Success(_)));
            assert_eq!(h.notifier.notices().len(), attempt);
        }
    }
}
