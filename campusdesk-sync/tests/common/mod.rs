//! Shared test helpers: in-process remote services and fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use campusdesk_remote::{
    EntityService, PaymentPatch, RemoteError, RemoteGateway, RemoteResult, StudentPatch,
};
use campusdesk_sync::demo;
use campusdesk_types::{
    HostelRoom, HostelRoomUpdate, Payment, PaymentMethod, Student, StudentId, StudentStatus,
};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// How a mock service finds and patches its records.
pub trait MockEntity: Clone + Send + Sync + 'static {
    type Patch: Clone + Send + Sync + 'static;

    fn key(&self) -> Option<String>;
    fn assign_key(&mut self, key: String);
    fn apply(&mut self, patch: &Self::Patch) -> Result<(), String>;
}

impl MockEntity for Student {
    type Patch = StudentPatch;

    fn key(&self) -> Option<String> {
        self.remote_id.clone()
    }

    fn assign_key(&mut self, key: String) {
        if self.remote_id.is_none() {
            self.remote_id = Some(key);
        }
    }

    fn apply(&mut self, patch: &StudentPatch) -> Result<(), String> {
        if let Some(course) = &patch.course {
            self.course.clone_from(course);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(balance) = patch.fee_balance {
            self.fee_balance = balance;
        }
        Ok(())
    }
}

impl MockEntity for Payment {
    type Patch = PaymentPatch;

    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn assign_key(&mut self, _key: String) {}

    fn apply(&mut self, patch: &PaymentPatch) -> Result<(), String> {
        if let Some(method) = patch.method {
            self.method = method;
        }
        if let Some(receipt) = &patch.receipt_number {
            self.receipt_number.clone_from(receipt);
        }
        Ok(())
    }
}

impl MockEntity for HostelRoom {
    type Patch = HostelRoomUpdate;

    fn key(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn assign_key(&mut self, _key: String) {}

    /// Column merge only, like a REST table: status is stored as sent.
    fn apply(&mut self, patch: &HostelRoomUpdate) -> Result<(), String> {
        if let Some(v) = &patch.building {
            self.building.clone_from(v);
        }
        if let Some(v) = patch.floor {
            self.floor = v;
        }
        if let Some(v) = &patch.room_number {
            self.room_number.clone_from(v);
        }
        if let Some(v) = patch.capacity {
            self.capacity = v;
        }
        if let Some(v) = &patch.occupants {
            self.occupants.clone_from(v);
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        Ok(())
    }
}

/// In-process stand-in for one remote table.
pub struct MockService<E: MockEntity> {
    name: &'static str,
    records: Mutex<Vec<E>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
    patches: Mutex<Vec<(String, E::Patch)>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl<E: MockEntity> MockService<E> {
    pub fn new(name: &'static str, records: Vec<E>) -> Arc<Self> {
        Arc::new(Self {
            name,
            records: Mutex::new(records),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            fail_list: AtomicBool::new(false),
            fail_create: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            patches: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
        })
    }

    pub fn records(&self) -> Vec<E> {
        self.records.lock().unwrap().clone()
    }

    pub fn set_records(&self, records: Vec<E>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    /// Patches received so far, keyed by remote id.
    pub fn patches(&self) -> Vec<(String, E::Patch)> {
        self.patches.lock().unwrap().clone()
    }

    /// Makes every `list_all` wait until the returned handle is notified.
    pub fn hold_lists(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl<E: MockEntity> EntityService for MockService<E> {
    type Entity = E;
    type Patch = E::Patch;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn list_all(&self) -> RemoteResult<Vec<E>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("connection reset".into()));
        }
        Ok(self.records())
    }

    async fn create(&self, entity: &E) -> RemoteResult<E> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RemoteError::Http {
                status: 503,
                body: "unavailable".into(),
            });
        }
        let mut stored = entity.clone();
        stored.assign_key(format!("row-new-{n}"));
        self.records.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: &E::Patch) -> RemoteResult<E> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("timed out".into()));
        }
        self.patches
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.key().as_deref() == Some(id))
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        record.apply(patch).map_err(RemoteError::Validation)?;
        Ok(record.clone())
    }
}

/// The three remote tables, seeded from the demo dataset.
pub struct RemoteFixture {
    pub students: Arc<MockService<Student>>,
    pub payments: Arc<MockService<Payment>>,
    pub rooms: Arc<MockService<HostelRoom>>,
}

impl RemoteFixture {
    /// Demo records; every student gets a remote row id `row-N`.
    pub fn seeded() -> Self {
        let students = demo::students()
            .into_iter()
            .enumerate()
            .map(|(i, mut s)| {
                s.remote_id = Some(format!("row-{}", i + 1));
                s
            })
            .collect();
        Self {
            students: MockService::new("students", students),
            payments: MockService::new("payments", demo::payments()),
            rooms: MockService::new("hostel_rooms", demo::hostel_rooms()),
        }
    }

    /// All three tables empty.
    pub fn empty() -> Self {
        Self {
            students: MockService::new("students", Vec::new()),
            payments: MockService::new("payments", Vec::new()),
            rooms: MockService::new("hostel_rooms", Vec::new()),
        }
    }

    pub fn gateway(&self) -> RemoteGateway {
        RemoteGateway::new(
            self.students.clone(),
            self.payments.clone(),
            self.rooms.clone(),
        )
    }

    pub fn fail_all_writes(&self) {
        self.students.fail_create(true);
        self.students.fail_update(true);
        self.payments.fail_create(true);
        self.rooms.fail_update(true);
    }
}

pub fn sid(raw: &str) -> StudentId {
    StudentId::parse(raw).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn payment(id: &str, student: &str, amount: i64) -> Payment {
    let date = day(2024, 3, 1);
    Payment {
        id: id.to_string(),
        student_id: sid(student),
        amount,
        method: PaymentMethod::Cash,
        date,
        receipt_number: campusdesk_types::receipt_number(date, id),
        collected_by: "front desk".to_string(),
    }
}

pub fn new_student(id: &str, first: &str) -> Student {
    Student {
        student_id: sid(id),
        remote_id: None,
        first_name: first.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{}@campus.test", first.to_lowercase()),
        phone: "555-0199".to_string(),
        course: "BBA".to_string(),
        admission_date: day(2024, 7, 1),
        status: StudentStatus::Active,
        fee_balance: 10000,
        hostel: None,
        documents: Vec::new(),
        audit: Vec::new(),
    }
}
