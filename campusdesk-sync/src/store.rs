//! In-memory collections and the session mode.

use crate::demo;
use campusdesk_types::{CollectionKind, Exam, HostelRoom, Payment, Student, StudentId};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{RwLock, RwLockWriteGuard};

/// Where the remote-backed collections come from for this session.
///
/// Decided once at construction and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    /// No usable backend: every collection is hydrated from and persisted
    /// to local storage.
    LocalOnly,
    /// Collections are fetched from and written to the remote backend.
    RemoteBacked,
}

/// The four entity collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collections {
    pub students: Vec<Student>,
    pub payments: Vec<Payment>,
    pub hostel_rooms: Vec<HostelRoom>,
    pub exams: Vec<Exam>,
}

impl Collections {
    /// The built-in demo dataset.
    pub fn demo() -> Self {
        Self {
            students: demo::students(),
            payments: demo::payments(),
            hostel_rooms: demo::hostel_rooms(),
            exams: demo::exams(),
        }
    }

    /// Empties one collection.
    pub fn clear(&mut self, kind: CollectionKind) {
        match kind {
            CollectionKind::Students => self.students.clear(),
            CollectionKind::Payments => self.payments.clear(),
            CollectionKind::HostelRooms => self.hostel_rooms.clear(),
            CollectionKind::Exams => self.exams.clear(),
        }
    }

    pub fn student(&self, id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.student_id == id)
    }

    pub fn student_mut(&mut self, id: &StudentId) -> Option<&mut Student> {
        self.students.iter_mut().find(|s| &s.student_id == id)
    }

    pub fn room(&self, id: &str) -> Option<&HostelRoom> {
        self.hostel_rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: &str) -> Option<&mut HostelRoom> {
        self.hostel_rooms.iter_mut().find(|r| r.id == id)
    }
}

/// Holds the authoritative in-memory snapshot of every collection.
///
/// The store performs no I/O. It is written only by the
/// [`SyncController`](crate::SyncController) and the
/// [`MutationFacade`](crate::MutationFacade); everyone else gets clones.
pub struct EntityStore {
    mode: DataMode,
    collections: RwLock<Collections>,
    /// Number of remote fetches in flight.
    loading: AtomicUsize,
}

impl EntityStore {
    /// Creates an empty store for the given mode.
    pub fn new(mode: DataMode) -> Self {
        Self {
            mode,
            collections: RwLock::new(Collections::default()),
            loading: AtomicUsize::new(0),
        }
    }

    /// Populates the collections at startup.
    ///
    /// In local-only mode `hydrated` is taken as-is (the caller has already
    /// substituted demo data for missing snapshots); `None` means the demo
    /// dataset. In remote-backed mode the remote-backed collections start
    /// empty pending the first refresh and `hydrated` is ignored; the
    /// locally-only exams start from the demo dataset.
    pub async fn initialize(&self, hydrated: Option<Collections>) {
        let initial = match self.mode {
            DataMode::LocalOnly => hydrated.unwrap_or_else(Collections::demo),
            DataMode::RemoteBacked => {
                let mut initial = Collections::demo();
                for kind in CollectionKind::ALL {
                    if kind.is_remote_backed() {
                        initial.clear(kind);
                    }
                }
                initial
            }
        };
        *self.collections.write().await = initial;
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn is_remote_backed(&self) -> bool {
        self.mode == DataMode::RemoteBacked
    }

    /// True while any remote fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn begin_loading(&self) {
        self.loading.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn end_loading(&self) {
        self.loading.fetch_sub(1, Ordering::SeqCst);
    }

    /// A full copy of every collection.
    pub async fn snapshot(&self) -> Collections {
        self.collections.read().await.clone()
    }

    pub async fn students(&self) -> Vec<Student> {
        self.collections.read().await.students.clone()
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.collections.read().await.payments.clone()
    }

    pub async fn hostel_rooms(&self) -> Vec<HostelRoom> {
        self.collections.read().await.hostel_rooms.clone()
    }

    pub async fn exams(&self) -> Vec<Exam> {
        self.collections.read().await.exams.clone()
    }

    pub async fn find_student(&self, id: &StudentId) -> Option<Student> {
        self.collections.read().await.student(id).cloned()
    }

    pub async fn find_payment(&self, id: &str) -> Option<Payment> {
        let collections = self.collections.read().await;
        collections.payments.iter().find(|p| p.id == id).cloned()
    }

    pub async fn find_room(&self, id: &str) -> Option<HostelRoom> {
        self.collections.read().await.room(id).cloned()
    }

    /// Exclusive access for writers inside this crate.
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.collections.write().await
    }
}
