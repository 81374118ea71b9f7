//! Local-only persistence of the entity store.

use crate::demo;
use crate::store::{Collections, EntityStore};
use campusdesk_storage::{LocalStore, SnapshotStore};
use campusdesk_types::CollectionKind;
use std::sync::Arc;
use tracing::{info, warn};

/// Hydrates and persists collections through a [`SnapshotStore`].
///
/// Only constructed in local-only mode, so nothing is written locally
/// while a remote backend is in use.
#[derive(Clone)]
pub struct LocalPersistence {
    snapshots: SnapshotStore,
}

impl LocalPersistence {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            snapshots: SnapshotStore::new(store),
        }
    }

    /// Reads every collection, substituting the demo dataset for any
    /// collection that is missing or unreadable.
    pub fn hydrate(&self) -> Collections {
        Collections {
            students: self.load_or_demo(CollectionKind::Students, demo::students),
            payments: self.load_or_demo(CollectionKind::Payments, demo::payments),
            hostel_rooms: self.load_or_demo(CollectionKind::HostelRooms, demo::hostel_rooms),
            exams: self.load_or_demo(CollectionKind::Exams, demo::exams),
        }
    }

    fn load_or_demo<T: serde::de::DeserializeOwned>(
        &self,
        kind: CollectionKind,
        demo: fn() -> Vec<T>,
    ) -> Vec<T> {
        self.snapshots.load(kind).unwrap_or_else(|| {
            info!("Using demo dataset for {}", kind);
            demo()
        })
    }

    /// Writes the current contents of `kinds` to local storage, in order.
    /// Failures (quota, I/O) are logged and otherwise ignored; the kinds
    /// that could not be written are returned.
    pub async fn persist(
        &self,
        store: &EntityStore,
        kinds: &[CollectionKind],
    ) -> Vec<CollectionKind> {
        let collections = store.snapshot().await;
        let mut failed = Vec::new();
        for kind in kinds {
            let result = match kind {
                CollectionKind::Students => self.snapshots.save(*kind, &collections.students),
                CollectionKind::Payments => self.snapshots.save(*kind, &collections.payments),
                CollectionKind::HostelRooms => {
                    self.snapshots.save(*kind, &collections.hostel_rooms)
                }
                CollectionKind::Exams => self.snapshots.save(*kind, &collections.exams),
            };
            if let Err(e) = result {
                warn!("Failed to persist {} locally: {}", kind, e);
                failed.push(*kind);
            }
        }
        if !failed.is_empty() && failed.len() < kinds.len() {
            warn!(
                "Stored snapshots of {:?} are out of step: only {:?} failed",
                kinds, failed
            );
        }
        failed
    }
}
