//! Transient user-visible notices ("toasts").

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// How long a notice stays visible unless configured otherwise.
pub const DEFAULT_NOTICE_DURATION_MS: u32 = 3000;

/// Severity of a notice; drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A message shown to the user for a short time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub duration_ms: u32,
}

impl Notice {
    /// Create a notice with the default duration.
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration_ms: DEFAULT_NOTICE_DURATION_MS,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    /// Override how long the notice stays visible.
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Receives notices for display.
pub trait NoticeSink {
    fn notify(&self, notice: Notice);
}

/// Collects notices until the view layer drains them.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: RefCell<Vec<Notice>>,
    duration_ms: Option<u32>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one display duration to every queued notice.
    pub fn with_duration(duration_ms: u32) -> Self {
        Self {
            pending: RefCell::new(Vec::new()),
            duration_ms: Some(duration_ms),
        }
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl NoticeSink for NoticeQueue {
    fn notify(&self, notice: Notice) {
        let notice = match self.duration_ms {
            Some(duration_ms) => notice.with_duration(duration_ms),
            None => notice,
        };
        self.pending.borrow_mut().push(notice);
    }
}
