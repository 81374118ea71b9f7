//! Mutation façade: the single write path into the entity store.
//!
//! Every operation follows the same policy. In local-only mode the change
//! is applied to the store and persisted. In remote-backed mode the change
//! is sent to the backend first; on success the store is refreshed from
//! the backend, on failure the [`FallbackPolicy`] decides whether the
//! change is applied locally (in memory only) or dropped. No operation
//! returns an error; each returns a [`MutationOutcome`] and appends a
//! notice to the session log.

use crate::controller::SyncController;
use crate::data::DataConfig;
use crate::notifications::NotificationLog;
use crate::outcome::{FallbackPolicy, MutationOutcome, RemoteWrite};
use crate::persistence::LocalPersistence;
use crate::store::{Collections, EntityStore};
use campusdesk_remote::{RemoteResult, StudentPatch};
use campusdesk_types::{
    CollectionKind, Exam, HostelAssignment, HostelRoom, HostelRoomUpdate, Payment, RoomStatus,
    Severity, Student, StudentId, StudentUpdate,
};
use std::sync::Arc;
use tracing::{debug, warn};

const STUDENTS: &[CollectionKind] = &[CollectionKind::Students];
// Students first: a failed payments write then leaves at worst a debited
// balance without its payment record.
const PAYMENTS: &[CollectionKind] = &[CollectionKind::Students, CollectionKind::Payments];
const ROOMS: &[CollectionKind] = &[CollectionKind::HostelRooms];
const EXAMS: &[CollectionKind] = &[CollectionKind::Exams];

fn remote_write<T>(what: &str, result: RemoteResult<T>) -> RemoteWrite<T> {
    match result {
        Ok(value) => RemoteWrite::Ok(value),
        Err(e) => {
            warn!("Remote {} failed: {}", what, e);
            RemoteWrite::RemoteError(e.to_string())
        }
    }
}

fn rejected<T>(reason: impl Into<String>) -> MutationOutcome<T> {
    MutationOutcome::Rejected {
        reason: reason.into(),
    }
}

/// Decrements the referenced student's balance by the payment amount.
/// Returns false, changing nothing, if the student is unknown.
fn debit_student(collections: &mut Collections, payment: &Payment, operator: &str) -> bool {
    match collections.student_mut(&payment.student_id) {
        Some(student) => {
            student.fee_balance -= payment.amount;
            student.record_audit(
                operator,
                format!("payment {} recorded (-{})", payment.id, payment.amount),
            );
            true
        }
        None => {
            warn!(
                "Payment {} references unknown student {}; balance not adjusted",
                payment.id, payment.student_id
            );
            false
        }
    }
}

/// The only public surface for creating and updating entities.
pub struct MutationFacade {
    store: Arc<EntityStore>,
    sync: Option<Arc<SyncController>>,
    persistence: Option<LocalPersistence>,
    notifications: Arc<NotificationLog>,
    config: DataConfig,
}

impl MutationFacade {
    /// `sync` must be present exactly when the store is remote-backed, and
    /// `persistence` only when it is local-only.
    pub fn new(
        store: Arc<EntityStore>,
        sync: Option<Arc<SyncController>>,
        persistence: Option<LocalPersistence>,
        notifications: Arc<NotificationLog>,
        config: DataConfig,
    ) -> Self {
        Self {
            store,
            sync,
            persistence,
            notifications,
            config,
        }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    // ── Students ─────────────────────────────────────────────────

    /// Adds a new student. Rejected if the student id is already taken.
    pub async fn add_student(&self, student: Student) -> MutationOutcome<Student> {
        let subject = format!("Student {}", student.student_id);
        let outcome = self.add_student_inner(student).await;
        self.report(&subject, "added", &outcome);
        outcome
    }

    async fn add_student_inner(&self, mut student: Student) -> MutationOutcome<Student> {
        if self.store.find_student(&student.student_id).await.is_some() {
            return rejected(format!("student {} already exists", student.student_id));
        }
        student.record_audit(&self.config.operator, "created");

        let apply = {
            let student = student.clone();
            move |c: &mut Collections| {
                if c.student(&student.student_id).is_some() {
                    return Err(format!("student {} already exists", student.student_id));
                }
                c.students.push(student.clone());
                Ok(student)
            }
        };

        let Some(sync) = &self.sync else {
            return self.local(STUDENTS, apply).await;
        };
        match remote_write("create student", sync.gateway().students.create(&student).await) {
            RemoteWrite::Ok(created) => {
                sync.refresh_all().await;
                MutationOutcome::Synced(created)
            }
            RemoteWrite::RemoteError(reason) => self.fall_back(reason, STUDENTS, apply).await,
        }
    }

    /// Merges `update` into the student with `student_id`.
    ///
    /// In remote-backed mode only course and status are sent to the
    /// backend (and only if the student's remote row is known); every
    /// other field is merged locally.
    pub async fn update_student(
        &self,
        student_id: &StudentId,
        update: StudentUpdate,
    ) -> MutationOutcome<Student> {
        let subject = format!("Student {student_id}");
        let outcome = self.update_student_inner(student_id, update).await;
        self.report(&subject, "updated", &outcome);
        outcome
    }

    async fn update_student_inner(
        &self,
        student_id: &StudentId,
        update: StudentUpdate,
    ) -> MutationOutcome<Student> {
        let Some(current) = self.store.find_student(student_id).await else {
            return rejected(format!("student {student_id} not found"));
        };

        let patch = StudentPatch {
            course: update.course.clone(),
            status: update.status,
            fee_balance: None,
        };
        let apply = {
            let student_id = student_id.clone();
            let operator = self.config.operator.clone();
            move |c: &mut Collections| {
                let student = c
                    .student_mut(&student_id)
                    .ok_or_else(|| format!("student {student_id} not found"))?;
                update.apply_to(student);
                if !update.is_empty() {
                    student.record_audit(
                        &operator,
                        format!("updated {}", update.changed_fields().join(", ")),
                    );
                }
                Ok(student.clone())
            }
        };

        let (Some(sync), Some(remote_id)) = (&self.sync, current.remote_id) else {
            return self.local(STUDENTS, apply).await;
        };
        if patch.is_empty() {
            debug!("No remote fields in update for {}; merging locally", student_id);
            return self.local(STUDENTS, apply).await;
        }

        let result = sync.gateway().students.update(&remote_id, &patch).await;
        match remote_write("update student", result) {
            RemoteWrite::Ok(remote) => {
                sync.refresh_all().await;
                // Locally-only fields go on top of the refreshed record.
                match self.apply_local(STUDENTS, apply).await {
                    Ok(merged) => MutationOutcome::Synced(merged),
                    Err(_) => MutationOutcome::Synced(remote),
                }
            }
            RemoteWrite::RemoteError(reason) => self.fall_back(reason, STUDENTS, apply).await,
        }
    }

    // ── Payments ─────────────────────────────────────────────────

    /// Records a payment and decrements the referenced student's balance
    /// by its amount, as one change. A payment for an unknown student is
    /// still recorded, without a balance adjustment.
    pub async fn add_payment(&self, payment: Payment) -> MutationOutcome<Payment> {
        let subject = format!("Payment {}", payment.id);
        let outcome = self.add_payment_inner(payment).await;
        self.report(&subject, "recorded", &outcome);
        outcome
    }

    async fn add_payment_inner(&self, payment: Payment) -> MutationOutcome<Payment> {
        if payment.amount <= 0 {
            return rejected(format!("amount must be positive, got {}", payment.amount));
        }
        if self.store.find_payment(&payment.id).await.is_some() {
            return rejected(format!("payment {} already exists", payment.id));
        }

        let apply = {
            let payment = payment.clone();
            let operator = self.config.operator.clone();
            move |c: &mut Collections| {
                if c.payments.iter().any(|p| p.id == payment.id) {
                    return Err(format!("payment {} already exists", payment.id));
                }
                debit_student(c, &payment, &operator);
                c.payments.push(payment.clone());
                Ok(payment)
            }
        };

        let Some(sync) = &self.sync else {
            return self.local(PAYMENTS, apply).await;
        };
        let result = sync.gateway().payments.create(&payment).await;
        let created = match remote_write("create payment", result) {
            RemoteWrite::Ok(created) => created,
            RemoteWrite::RemoteError(reason) => {
                return self.fall_back(reason, PAYMENTS, apply).await;
            }
        };

        let balance_error = self.push_balance(sync, &payment).await;
        sync.refresh_all().await;

        match balance_error {
            None => MutationOutcome::Synced(created),
            Some(reason) => {
                let debit = {
                    let operator = self.config.operator.clone();
                    move |c: &mut Collections| Ok(debit_student(c, &payment, &operator))
                };
                self.fall_back(reason, STUDENTS, debit)
                    .await
                    .map(|_| created)
            }
        }
    }

    /// Sends the decremented balance to the student's remote row. Returns
    /// the failure reason if the backend refused it.
    async fn push_balance(&self, sync: &SyncController, payment: &Payment) -> Option<String> {
        let Some(student) = self.store.find_student(&payment.student_id).await else {
            warn!(
                "Payment {} references unknown student {}; balance not adjusted",
                payment.id, payment.student_id
            );
            return None;
        };
        let Some(remote_id) = student.remote_id else {
            debug!("Student {} has no remote row; balance left to refresh", student.student_id);
            return None;
        };
        let patch = StudentPatch {
            fee_balance: Some(student.fee_balance - payment.amount),
            ..Default::default()
        };
        let result = sync.gateway().students.update(&remote_id, &patch).await;
        match remote_write("adjust balance", result) {
            RemoteWrite::Ok(_) => None,
            RemoteWrite::RemoteError(reason) => Some(reason),
        }
    }

    // ── Hostel rooms ─────────────────────────────────────────────

    /// Merges `update` into the room. An explicit status always wins over
    /// the status implied by occupancy. Rejected if the room is unknown or
    /// the update would exceed capacity.
    pub async fn update_hostel_room(
        &self,
        room_id: &str,
        update: HostelRoomUpdate,
    ) -> MutationOutcome<HostelRoom> {
        let subject = format!("Room {room_id}");
        let outcome = self.update_hostel_room_inner(room_id, update).await;
        self.report(&subject, "updated", &outcome);
        outcome
    }

    async fn update_hostel_room_inner(
        &self,
        room_id: &str,
        update: HostelRoomUpdate,
    ) -> MutationOutcome<HostelRoom> {
        let Some(mut preview) = self.store.find_room(room_id).await else {
            return rejected(format!("room {room_id} not found"));
        };
        if let Err(reason) = update.apply_to(&mut preview) {
            return rejected(reason);
        }

        let Some(sync) = &self.sync else {
            return self.local(ROOMS, Self::room_apply(room_id, update)).await;
        };

        // The backend stores status as sent; carry the re-derived one.
        let mut patch = update.clone();
        if patch.status.is_none() && (patch.occupants.is_some() || patch.capacity.is_some()) {
            patch.status = Some(preview.status);
        }
        let result = sync.gateway().hostel_rooms.update(room_id, &patch).await;
        match remote_write("update hostel room", result) {
            RemoteWrite::Ok(updated) => {
                sync.refresh_all().await;
                MutationOutcome::Synced(updated)
            }
            RemoteWrite::RemoteError(reason) => {
                self.fall_back(reason, ROOMS, Self::room_apply(room_id, update))
                    .await
            }
        }
    }

    fn room_apply(
        room_id: &str,
        update: HostelRoomUpdate,
    ) -> impl FnOnce(&mut Collections) -> Result<HostelRoom, String> + use<> {
        let room_id = room_id.to_string();
        move |c: &mut Collections| {
            let room = c
                .room_mut(&room_id)
                .ok_or_else(|| format!("room {room_id} not found"))?;
            update.apply_to(room)?;
            Ok(room.clone())
        }
    }

    /// Places a student in a room and records the assignment on the
    /// student.
    pub async fn allocate_room(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        let subject = format!("Student {student_id}");
        let outcome = self.allocate_room_inner(room_id, student_id).await;
        self.report(&subject, &format!("allocated to room {room_id}"), &outcome);
        outcome
    }

    async fn allocate_room_inner(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        let collections = self.store.snapshot().await;
        let Some(room) = collections.room(room_id) else {
            return rejected(format!("room {room_id} not found"));
        };
        let Some(student) = collections.student(student_id) else {
            return rejected(format!("student {student_id} not found"));
        };
        if room.status == RoomStatus::Maintenance {
            return rejected(format!("room {room_id} is under maintenance"));
        }
        if room.has_occupant(student_id) {
            return rejected(format!("student {student_id} already occupies room {room_id}"));
        }
        if room.is_at_capacity() {
            return rejected(format!("room {room_id} is full"));
        }
        if let Some(current) = &student.hostel {
            return rejected(format!(
                "student {student_id} is already assigned to {}-{}",
                current.building, current.room
            ));
        }

        let mut occupants = room.occupants.clone();
        occupants.push(student_id.clone());
        let assignment = HostelAssignment {
            building: room.building.clone(),
            room: room.room_number.clone(),
        };

        let outcome = self
            .update_hostel_room_inner(room_id, HostelRoomUpdate::occupants(occupants))
            .await;
        if outcome.is_applied() {
            let update = StudentUpdate {
                hostel: Some(Some(assignment)),
                ..Default::default()
            };
            self.update_student_inner(student_id, update).await;
        }
        outcome
    }

    /// Removes a student from a room and clears the student's assignment.
    pub async fn vacate_room(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        let subject = format!("Student {student_id}");
        let outcome = self.vacate_room_inner(room_id, student_id).await;
        self.report(&subject, &format!("moved out of room {room_id}"), &outcome);
        outcome
    }

    async fn vacate_room_inner(
        &self,
        room_id: &str,
        student_id: &StudentId,
    ) -> MutationOutcome<HostelRoom> {
        let Some(room) = self.store.find_room(room_id).await else {
            return rejected(format!("room {room_id} not found"));
        };
        if !room.has_occupant(student_id) {
            return rejected(format!("student {student_id} is not in room {room_id}"));
        }

        let occupants = room
            .occupants
            .into_iter()
            .filter(|o| o != student_id)
            .collect();
        let outcome = self
            .update_hostel_room_inner(room_id, HostelRoomUpdate::occupants(occupants))
            .await;
        if outcome.is_applied() && self.store.find_student(student_id).await.is_some() {
            let update = StudentUpdate {
                hostel: Some(None),
                ..Default::default()
            };
            self.update_student_inner(student_id, update).await;
        }
        outcome
    }

    // ── Exams (locally-only collection) ──────────────────────────

    /// Adds an exam. Exams never reach the remote backend.
    pub async fn add_exam(&self, exam: Exam) -> MutationOutcome<Exam> {
        let subject = format!("Exam {}", exam.id);
        let outcome = self
            .local(EXAMS, move |c: &mut Collections| {
                if c.exams.iter().any(|e| e.id == exam.id) {
                    return Err(format!("exam {} already exists", exam.id));
                }
                c.exams.push(exam.clone());
                Ok(exam)
            })
            .await;
        self.report(&subject, "added", &outcome);
        outcome
    }

    /// Publishes or withdraws an exam.
    pub async fn set_exam_published(
        &self,
        exam_id: &str,
        published: bool,
    ) -> MutationOutcome<Exam> {
        let subject = format!("Exam {exam_id}");
        let verb = if published { "published" } else { "withdrawn" };
        let id = exam_id.to_string();
        let outcome = self
            .local(EXAMS, move |c: &mut Collections| {
                let exam = c
                    .exams
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or_else(|| format!("exam {id} not found"))?;
                exam.published = published;
                Ok(exam.clone())
            })
            .await;
        self.report(&subject, verb, &outcome);
        outcome
    }

    // ── Shared paths ─────────────────────────────────────────────

    /// Applies a change to the store under one write lock, then persists
    /// the touched collections when local-only.
    async fn apply_local<T>(
        &self,
        kinds: &[CollectionKind],
        apply: impl FnOnce(&mut Collections) -> Result<T, String>,
    ) -> Result<T, String> {
        let result = {
            let mut collections = self.store.write().await;
            apply(&mut collections)
        };
        if result.is_ok() {
            if let Some(persistence) = &self.persistence {
                persistence.persist(&self.store, kinds).await;
            }
        }
        result
    }

    async fn local<T>(
        &self,
        kinds: &[CollectionKind],
        apply: impl FnOnce(&mut Collections) -> Result<T, String>,
    ) -> MutationOutcome<T> {
        match self.apply_local(kinds, apply).await {
            Ok(value) => MutationOutcome::Applied(value),
            Err(reason) => MutationOutcome::Rejected { reason },
        }
    }

    async fn fall_back<T>(
        &self,
        reason: String,
        kinds: &[CollectionKind],
        apply: impl FnOnce(&mut Collections) -> Result<T, String>,
    ) -> MutationOutcome<T> {
        match self.config.fallback_policy {
            FallbackPolicy::ApplyLocally => match self.apply_local(kinds, apply).await {
                Ok(value) => MutationOutcome::FallbackApplied { value, reason },
                Err(rejected) => MutationOutcome::Rejected { reason: rejected },
            },
            FallbackPolicy::Skip => MutationOutcome::RemoteError { reason },
        }
    }

    fn report<T>(&self, subject: &str, verb: &str, outcome: &MutationOutcome<T>) {
        let (severity, message) = match outcome {
            MutationOutcome::Applied(_) | MutationOutcome::Synced(_) => {
                (Severity::Success, format!("{subject} {verb}"))
            }
            MutationOutcome::FallbackApplied { reason, .. } => (
                Severity::Warning,
                format!("{subject} {verb} for this session only; remote sync failed: {reason}"),
            ),
            MutationOutcome::RemoteError { reason } | MutationOutcome::Rejected { reason } => {
                (Severity::Error, format!("{subject} not {verb}: {reason}"))
            }
        };
        self.notifications.notify(severity, message);
    }
}
