//! Whole-collection snapshots on top of a [`LocalStore`].

use crate::{LocalStore, StorageResult};
use campusdesk_types::CollectionKind;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Serializes entity collections into a [`LocalStore`], one key per
/// collection.
///
/// Writes overwrite the previous snapshot (no merge). Reads never fail:
/// a missing key and an unreadable snapshot both come back as `None`, so
/// the caller can substitute its own default.
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn LocalStore>,
    namespace: String,
}

impl SnapshotStore {
    /// Creates a snapshot adapter with the default `campusdesk` namespace.
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self::with_namespace(store, "campusdesk")
    }

    /// Creates a snapshot adapter whose keys are prefixed with `namespace`.
    pub fn with_namespace(store: Arc<dyn LocalStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// The storage key used for a collection.
    pub fn key_for(&self, kind: CollectionKind) -> String {
        format!("{}.{}", self.namespace, kind.storage_key())
    }

    /// Loads a collection snapshot.
    pub fn load<T: DeserializeOwned>(&self, kind: CollectionKind) -> Option<Vec<T>> {
        let key = self.key_for(kind);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored snapshot for {}", kind);
                return None;
            }
            Err(e) => {
                warn!("Failed to read snapshot {}: {}", key, e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("Discarding unreadable snapshot {}: {}", key, e);
                None
            }
        }
    }

    /// Serializes and stores a full collection, replacing the previous
    /// snapshot.
    pub fn save<T: Serialize>(&self, kind: CollectionKind, items: &[T]) -> StorageResult<()> {
        let key = self.key_for(kind);
        let json = serde_json::to_string(items)?;
        self.store.set(&key, &json)?;
        debug!("Saved {} {} to local snapshot", items.len(), kind);
        Ok(())
    }
}
