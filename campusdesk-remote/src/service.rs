//! Per-entity service contract.

use crate::error::RemoteResult;
use async_trait::async_trait;
use campusdesk_types::{
    HostelRoom, HostelRoomUpdate, Payment, PaymentMethod, Student, StudentStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Remote CRUD for one entity type.
#[async_trait]
pub trait EntityService: Send + Sync {
    type Entity: Send + Sync;
    type Patch: Send + Sync;

    /// Name of the remote collection, for diagnostics.
    fn name(&self) -> &'static str;

    /// Fetches every record.
    async fn list_all(&self) -> RemoteResult<Vec<Self::Entity>>;

    /// Creates a record and returns it as stored by the backend,
    /// including any server-assigned fields.
    async fn create(&self, entity: &Self::Entity) -> RemoteResult<Self::Entity>;

    /// Patches the record with remote row id `id`.
    async fn update(&self, id: &str, patch: &Self::Patch) -> RemoteResult<Self::Entity>;
}

/// Fields of a student the backend accepts in a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StudentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_balance: Option<i64>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.course.is_none() && self.status.is_none() && self.fee_balance.is_none()
    }
}

/// Fields of a payment the backend accepts in a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
}

pub type StudentService = dyn EntityService<Entity = Student, Patch = StudentPatch>;
pub type PaymentService = dyn EntityService<Entity = Payment, Patch = PaymentPatch>;
pub type HostelRoomService = dyn EntityService<Entity = HostelRoom, Patch = HostelRoomUpdate>;

/// One service per remote-backed entity type.
#[derive(Clone)]
pub struct RemoteGateway {
    pub students: Arc<StudentService>,
    pub payments: Arc<PaymentService>,
    pub hostel_rooms: Arc<HostelRoomService>,
}

impl RemoteGateway {
    pub fn new(
        students: Arc<StudentService>,
        payments: Arc<PaymentService>,
        hostel_rooms: Arc<HostelRoomService>,
    ) -> Self {
        Self {
            students,
            payments,
            hostel_rooms,
        }
    }
}
