//! User-facing notification contract.
//!
//! # Responsibility
//! - Describe operation outcomes to the presentation collaborator.
//! - Provide a recording sink for tests and a `log` forwarding sink.
//!
//! # Invariants
//! - Messages are complete sentences ready for display.

use log::{info, warn};
use std::fmt::{Display, Formatter};

/// Display style of one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    Info,
    Neutral,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
            Self::Neutral => "neutral",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One emitted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&mut self, kind: NotificationKind, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        (**self).notify(kind, message);
    }
}

/// Keeps every notification in emission order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    entries: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Drains recorded notifications.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        self.entries.push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}

/// Forwards notifications to the `log` facade.
///
/// Warning and Error kinds log at `warn`; everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Warning | NotificationKind::Error => {
                warn!("event=notify module=notify kind={kind} message={message:?}")
            }
            _ => info!("event=notify module=notify kind={kind} message={message:?}"),
        }
    }
}
