//! Composition root: one [`CampusData`] per session.

use crate::controller::{RefreshReport, SyncController};
use crate::mutation::MutationFacade;
use crate::notifications::NotificationLog;
use crate::outcome::{FallbackPolicy, MutationOutcome};
use crate::persistence::LocalPersistence;
use crate::store::{DataMode, EntityStore};
use campusdesk_remote::{RemoteConfig, RemoteGateway, RestClient};
use campusdesk_storage::LocalStore;
use campusdesk_types::{
    Exam, HostelRoom, HostelRoomUpdate, NotificationItem, Payment, Severity, Student, StudentId,
    StudentUpdate,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Session settings for the data layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Recorded as the actor of student audit entries.
    pub operator: String,
    /// What to do when a remote write fails.
    pub fallback_policy: FallbackPolicy,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            operator: "admin".to_string(),
            fallback_policy: FallbackPolicy::default(),
        }
    }
}

/// The data layer as seen by the rest of the client.
///
/// Reads go straight to the [`EntityStore`]; writes go through the
/// [`MutationFacade`]. The mode is fixed at construction.
pub struct CampusData {
    store: Arc<EntityStore>,
    sync: Option<Arc<SyncController>>,
    persistence: Option<LocalPersistence>,
    notifications: Arc<NotificationLog>,
    mutations: MutationFacade,
}

impl CampusData {
    /// A session backed by local durable storage only.
    pub fn local_only(local: Arc<dyn LocalStore>, config: DataConfig) -> Self {
        let store = Arc::new(EntityStore::new(DataMode::LocalOnly));
        Self::assemble(store, None, Some(LocalPersistence::new(local)), config)
    }

    /// A session backed by the remote gateway. Nothing is written locally.
    pub fn remote_backed(gateway: RemoteGateway, config: DataConfig) -> Self {
        let store = Arc::new(EntityStore::new(DataMode::RemoteBacked));
        let sync = Arc::new(SyncController::new(Arc::clone(&store), gateway));
        Self::assemble(store, Some(sync), None, config)
    }

    /// Picks the mode from `remote`: remote-backed if it is configured and
    /// a client can be built, local-only otherwise.
    pub fn from_config(
        remote: &RemoteConfig,
        local: Arc<dyn LocalStore>,
        config: DataConfig,
    ) -> Self {
        if !remote.is_configured() {
            info!("Remote backend not configured, running local-only");
            return Self::local_only(local, config);
        }
        match RestClient::new(remote) {
            Ok(client) => {
                info!("Using remote backend at {}", remote.url);
                Self::remote_backed(client.gateway(), config)
            }
            Err(e) => {
                warn!("Failed to set up remote client, running local-only: {}", e);
                Self::local_only(local, config)
            }
        }
    }

    fn assemble(
        store: Arc<EntityStore>,
        sync: Option<Arc<SyncController>>,
        persistence: Option<LocalPersistence>,
        config: DataConfig,
    ) -> Self {
        let notifications = Arc::new(NotificationLog::new());
        let mutations = MutationFacade::new(
            Arc::clone(&store),
            sync.clone(),
            persistence.clone(),
            Arc::clone(&notifications),
            config,
        );
        Self {
            store,
            sync,
            persistence,
            notifications,
            mutations,
        }
    }

    /// Populates the store. Local-only sessions hydrate from storage;
    /// remote-backed sessions run the first refresh and return its report.
    pub async fn initialize(&self) -> Option<RefreshReport> {
        let hydrated = self.persistence.as_ref().map(LocalPersistence::hydrate);
        self.store.initialize(hydrated).await;
        self.refresh_all().await
    }

    /// Re-fetches the remote-backed collections. `None` when local-only.
    pub async fn refresh_all(&self) -> Option<RefreshReport> {
        match &self.sync {
            Some(sync) => Some(sync.refresh_all().await),
            None => None,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.store.mode()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    pub fn mutations(&self) -> &MutationFacade {
        &self.mutations
    }

    pub fn sync_controller(&self) -> Option<&Arc<SyncController>> {
        self.sync.as_ref()
    }

    // ── Reads ────────────────────────────────────────────────────

    pub async fn students(&self) -> Vec<Student> {
        self.store.students().await
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.store.payments().await
    }

    pub async fn hostel_rooms(&self) -> Vec<HostelRoom> {
        self.store.hostel_rooms().await
    }

    pub async fn exams(&self) -> Vec<Exam> {
        self.store.exams().await
    }

    pub async fn find_student(&self, id: &StudentId) -> Option<Student> {
        self.store.find_student(id).await
    }

    /// Payments recorded against one student, oldest first.
    pub async fn payments_for(&self, id: &StudentId) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .store
            .payments()
            .await
            .into_iter()
            .filter(|p| &p.student_id == id)
            .collect();
        payments.sort_by_key(|p| p.date);
        payments
    }

    /// Sum of all positive fee balances.
    pub async fn total_outstanding(&self) -> i64 {
        self.store
            .students()
            .await
            .iter()
            .map(|s| s.fee_balance.max(0))
            .sum()
    }

    // ── Writes ───────────────────────────────────────────────────

    pub async fn add_student(&self, student: Student) -> MutationOutcome<Student> {
        self.mutations.add_student(student).await
    }

    pub async fn update_student(
        &self,
        id: &StudentId,
        update: StudentUpdate,
    ) -> MutationOutcome<Student> {
        self.mutations.update_student(id, update).await
    }

    pub async fn add_payment(&self, payment: Payment) -> MutationOutcome<Payment> {
        self.mutations.add_payment(payment).await
    }

    pub async fn update_hostel_room(
        &self,
        room_id: &str,
        update: HostelRoomUpdate,
    ) -> MutationOutcome<HostelRoom> {
        self.mutations.update_hostel_room(room_id, update).await
    }

    pub async fn allocate_room(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        self.mutations.allocate_room(room_id, student_id).await
    }

    pub async fn vacate_room(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        self.mutations.vacate_room(room_id, student_id).await
    }

    pub async fn add_exam(&self, exam: Exam) -> MutationOutcome<Exam> {
        self.mutations.add_exam(exam).await
    }

    pub async fn set_exam_published(
        &self,
        exam_id: &str,
        published: bool,
    ) -> MutationOutcome<Exam> {
        self.mutations.set_exam_published(exam_id, published).await
    }

    // ── Notifications ────────────────────────────────────────────

    pub fn add_notification(&self, item: NotificationItem) {
        self.notifications.add(item);
    }

    /// Creates and adds a notice, returning its id.
    pub fn notify(&self, severity: Severity, message: impl Into<String>) -> String {
        self.notifications.notify(severity, message)
    }

    pub fn mark_notification_read(&self, id: &str) -> bool {
        self.notifications.mark_read(id)
    }

    pub fn mark_all_notifications_read(&self) {
        self.notifications.mark_all_read();
    }

    /// Newest first.
    pub fn notifications(&self) -> Vec<NotificationItem> {
        self.notifications.list()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.unread_count()
    }
}
