use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-facing dialog: title plus one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success!".to_string(),
            text: text.into(),
        }
    }

    /// The server answered and refused the request.
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Failed!".to_string(),
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error!".to_string(),
            text: text.into(),
        }
    }
}

/// Port for showing dialogs to the user. Fire and forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Prints notices as framed blocks on stdout.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let marker = match notice.level {
            NoticeLevel::Success => "+",
            NoticeLevel::Error => "!",
        };
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "[{}] {}\n    {}", marker, notice.title, notice.text);
        let _ = stdout.flush();
    }
}

/// Mock notifier for testing.
#[derive(Default)]
pub struct MockNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for MockNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
