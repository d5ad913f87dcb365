use parking_lot::Mutex;
use tracing::{error, info};

use crate::domain::ports::Notifier;

/// Notifier that only logs; used when no interactive surface is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_success(&self, message: &str) {
        info!(target: "psico_agenda::notify", "{message}");
    }

    fn notify_error(&self, message: &str) {
        error!(target: "psico_agenda::notify", "{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }
}

/// Keeps every notice so the host can render (or drain) them later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.notices.lock().push(Notice::Success(message.to_string()));
    }

    fn notify_error(&self, message: &str) {
        self.notices.lock().push(Notice::Error(message.to_string()));
    }
}
