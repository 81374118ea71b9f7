use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Success,
}

/// A session-scoped notice shown to the operator. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationItem {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl NotificationItem {
    /// Creates an unread notice with a fresh id, stamped now.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: crate::new_record_id("NTF"),
            severity,
            message: message.into(),
            created_at: Utc::now(),
            read: false,
        }
    }
}
