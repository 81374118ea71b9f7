//! Session notification log.

use campusdesk_types::{NotificationItem, Severity};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Most-recent-first list of notices for the current session.
///
/// Unbounded and never persisted.
#[derive(Debug, Default)]
pub struct NotificationLog {
    items: Mutex<Vec<NotificationItem>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, Vec<NotificationItem>> {
        // A panic mid-push cannot leave the Vec inconsistent.
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prepends an item.
    pub fn add(&self, item: NotificationItem) {
        self.items().insert(0, item);
    }

    /// Prepends a fresh unread notice and returns its id.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> String {
        let item = NotificationItem::new(severity, message);
        let id = item.id.clone();
        self.add(item);
        id
    }

    /// Marks the matching item read. Returns false if no item matched.
    pub fn mark_read(&self, id: &str) -> bool {
        match self.items().iter_mut().find(|n| n.id == id) {
            Some(item) => {
                item.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self) {
        for item in self.items().iter_mut() {
            item.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items().iter().filter(|n| !n.read).count()
    }

    /// Copy of all items, newest first.
    pub fn list(&self) -> Vec<NotificationItem> {
        self.items().clone()
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
