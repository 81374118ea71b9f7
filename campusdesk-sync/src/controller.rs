//! Synchronization controller: fetch-and-reconcile against the remote
//! backend.

use crate::demo;
use crate::store::EntityStore;
use campusdesk_remote::{RemoteGateway, RemoteResult};
use campusdesk_types::CollectionKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Where a collection's contents came from after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionSource {
    /// Replaced with `count` records fetched from the backend.
    Remote { count: usize },
    /// Replaced with the demo dataset because the fetch failed or came
    /// back empty.
    Demo { reason: String },
}

impl CollectionSource {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

/// Per-collection result of [`SyncController::refresh_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub students: CollectionSource,
    pub payments: CollectionSource,
    pub hostel_rooms: CollectionSource,
}

impl RefreshReport {
    /// True if every collection came from the backend.
    pub fn fully_remote(&self) -> bool {
        self.students.is_remote() && self.payments.is_remote() && self.hostel_rooms.is_remote()
    }
}

/// Keeps the remote-backed collections of an [`EntityStore`] in line with
/// the backend.
pub struct SyncController {
    store: Arc<EntityStore>,
    gateway: RemoteGateway,
    refreshes: AtomicU64,
}

impl SyncController {
    pub fn new(store: Arc<EntityStore>, gateway: RemoteGateway) -> Self {
        Self {
            store,
            gateway,
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn gateway(&self) -> &RemoteGateway {
        &self.gateway
    }

    /// Number of completed `refresh_all` calls.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Fetches students, payments and hostel rooms concurrently and
    /// replaces each collection independently.
    ///
    /// A non-empty result replaces the collection. An empty result or a
    /// failure substitutes the demo dataset, never the previous snapshot.
    /// Exams are not touched. The store reports `loading` until every
    /// overlapping refresh has finished.
    pub async fn refresh_all(&self) -> RefreshReport {
        self.store.begin_loading();
        debug!("Refreshing remote-backed collections");

        let (students, payments, rooms) = tokio::join!(
            self.gateway.students.list_all(),
            self.gateway.payments.list_all(),
            self.gateway.hostel_rooms.list_all(),
        );

        let (students, students_src) = resolve(CollectionKind::Students, students, demo::students);
        let (payments, payments_src) = resolve(CollectionKind::Payments, payments, demo::payments);
        let (rooms, rooms_src) = resolve(CollectionKind::HostelRooms, rooms, demo::hostel_rooms);

        {
            let mut collections = self.store.write().await;
            collections.students = students;
            collections.payments = payments;
            collections.hostel_rooms = rooms;
        }

        self.store.end_loading();
        self.refreshes.fetch_add(1, Ordering::SeqCst);

        RefreshReport {
            students: students_src,
            payments: payments_src,
            hostel_rooms: rooms_src,
        }
    }
}

fn resolve<T>(
    kind: CollectionKind,
    fetched: RemoteResult<Vec<T>>,
    demo: fn() -> Vec<T>,
) -> (Vec<T>, CollectionSource) {
    match fetched {
        Ok(items) if !items.is_empty() => {
            let count = items.len();
            debug!("Loaded {} {} from remote", count, kind);
            (items, CollectionSource::Remote { count })
        }
        Ok(_) => {
            info!("Remote {} is empty, showing demo dataset", kind);
            (
                demo(),
                CollectionSource::Demo {
                    reason: "remote collection is empty".to_string(),
                },
            )
        }
        Err(e) => {
            warn!("Failed to fetch {} from remote, showing demo dataset: {}", kind, e);
            (
                demo(),
                CollectionSource::Demo {
                    reason: e.to_string(),
                },
            )
        }
    }
}
