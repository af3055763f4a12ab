//! User-facing notifications for row actions and background failures.

use std::collections::VecDeque;

use tracing::{error, info};

/// Maximum status lines retained by the TUI.
const MAX_STATUS_LINES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Info,
    Error,
}

pub trait Notifier {
    fn notify(&mut self, kind: NotifyKind, message: &str);
}

/// Notifications as log events, for one-shot commands.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, kind: NotifyKind, message: &str) {
        match kind {
            NotifyKind::Success | NotifyKind::Info => info!("{message}"),
            NotifyKind::Error => error!("{message}"),
        }
    }
}

/// Rolling status panel shown under the table.
#[derive(Debug, Default)]
pub struct StatusLine {
    lines: VecDeque<(NotifyKind, String)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest last.
    pub fn lines(&self) -> impl DoubleEndedIterator<Item = &(NotifyKind, String)> {
        self.lines.iter()
    }

    pub fn latest(&self) -> Option<&(NotifyKind, String)> {
        self.lines.back()
    }
}

impl Notifier for StatusLine {
    fn notify(&mut self, kind: NotifyKind, message: &str) {
        self.lines.push_back((kind, message.to_string()));
        while self.lines.len() > MAX_STATUS_LINES {
            self.lines.pop_front();
        }
        // Mirrored to the log file, if any.
        LogNotifier.notify(kind, message);
    }
}
