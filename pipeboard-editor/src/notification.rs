//! Transient user notifications
//!
//! The dashboard has a single notification slot: a new message replaces the
//! previous one, and a message stops being shown after [`AUTO_HIDE_MS`].

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a notification stays visible
pub const AUTO_HIDE_MS: i64 = 3000;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }

    fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }

    /// Whether the notification is still on screen at `now`
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now - self.raised_at < Duration::milliseconds(AUTO_HIDE_MS)
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_hide() {
        let notification = Notification::success("Pipeline saved successfully");
        let raised = notification.raised_at;

        assert!(notification.is_visible_at(raised));
        assert!(notification.is_visible_at(raised + Duration::milliseconds(2999)));
        assert!(!notification.is_visible_at(raised + Duration::milliseconds(3000)));
    }

    #[test]
    fn test_kind() {
        assert!(Notification::error("Failed to save pipeline").is_error());
        assert!(!Notification::success("ok").is_error());
    }
}
