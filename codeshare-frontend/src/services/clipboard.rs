use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Mutex;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("No clipboard is configured")]
    Unavailable,

    #[error("Clipboard command failed: {0}")]
    Command(String),
}

/// Port for copying text to the system clipboard.
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes the text into an external command such as `xclip`, `wl-copy` or `pbcopy`.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Build from an argv. Returns `None` for an empty argv.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl ClipboardWriter for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClipboardError::Command(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| ClipboardError::Command(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipboardError::Command(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Command(format!(
                "{} exited with {}",
                self.program, status
            )))
        }
    }
}

/// Used when no clipboard command is configured; every copy fails.
pub struct DisabledClipboard;

#[async_trait]
impl ClipboardWriter for DisabledClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Mock clipboard for testing.
pub struct MockClipboard {
    fail: bool,
    writes: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            fail: false,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// A clipboard whose writes are rejected.
    pub fn failing() -> Self {
        Self {
            fail: true,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every text that was successfully copied, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl Default for MockClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardWriter for MockClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Command(
                "Mock clipboard rejects writes".to_string(),
            ));
        }

        if let Ok(mut writes) = self.writes.lock() {
            writes.push(text.to_string());
        }
        Ok(())
    }
}
