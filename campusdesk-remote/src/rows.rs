//! Wire rows for the REST backend.
//!
//! Columns are snake_case, dates arrive as strings in whatever form the
//! column type renders, and enumerations arrive as free text. Each row
//! type maps to and from its entity.

use crate::error::{RemoteError, RemoteResult};
use crate::service::{PaymentPatch, StudentPatch};
use campusdesk_types::{
    AuditEntry, DocumentRef, HostelAssignment, HostelRoom, HostelRoomUpdate, Payment, Student,
    StudentId, parse_date,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A row type stored in one remote table.
pub trait TableRow: Serialize + DeserializeOwned + Send + Sync {
    type Entity: Send + Sync;
    type Patch: Send + Sync;

    /// Table name.
    const TABLE: &'static str;

    /// Column addressed by `update`.
    const KEY_COLUMN: &'static str = "id";

    fn from_entity(entity: &Self::Entity) -> Self;

    fn into_entity(self) -> RemoteResult<Self::Entity>;

    fn patch_body(patch: &Self::Patch) -> Value;
}

fn parse_student_id(raw: &str) -> RemoteResult<StudentId> {
    StudentId::parse(raw).map_err(RemoteError::from)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub student_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub course: String,
    pub admission_date: String,
    pub status: String,
    #[serde(default)]
    pub fee_balance: i64,
    #[serde(default)]
    pub hostel_building: Option<String>,
    #[serde(default)]
    pub hostel_room: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub audit: Vec<AuditEntry>,
}

impl TableRow for StudentRow {
    type Entity = Student;
    type Patch = StudentPatch;

    const TABLE: &'static str = "students";

    fn from_entity(s: &Student) -> Self {
        Self {
            id: s.remote_id.clone(),
            student_id: s.student_id.to_string(),
            first_name: s.first_name.clone(),
            last_name: s.last_name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            course: s.course.clone(),
            admission_date: s.admission_date.format("%Y-%m-%d").to_string(),
            status: s.status.to_string(),
            fee_balance: s.fee_balance,
            hostel_building: s.hostel.as_ref().map(|h| h.building.clone()),
            hostel_room: s.hostel.as_ref().map(|h| h.room.clone()),
            documents: s.documents.clone(),
            audit: s.audit.clone(),
        }
    }

    fn into_entity(self) -> RemoteResult<Student> {
        let hostel = match (self.hostel_building, self.hostel_room) {
            (Some(building), Some(room)) => Some(HostelAssignment { building, room }),
            _ => None,
        };
        Ok(Student {
            student_id: parse_student_id(&self.student_id)?,
            remote_id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            course: self.course,
            admission_date: parse_date(&self.admission_date)?,
            status: self.status.parse()?,
            fee_balance: self.fee_balance,
            hostel,
            documents: self.documents,
            audit: self.audit,
        })
    }

    fn patch_body(patch: &StudentPatch) -> Value {
        let mut body = Map::new();
        if let Some(course) = &patch.course {
            body.insert("course".into(), json!(course));
        }
        if let Some(status) = patch.status {
            body.insert("status".into(), json!(status.as_str()));
        }
        if let Some(balance) = patch.fee_balance {
            body.insert("fee_balance".into(), json!(balance));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    pub id: String,
    pub student_id: String,
    pub amount: i64,
    pub method: String,
    pub date: String,
    #[serde(default)]
    pub receipt_number: String,
    #[serde(default)]
    pub collected_by: String,
}

impl TableRow for PaymentRow {
    type Entity = Payment;
    type Patch = PaymentPatch;

    const TABLE: &'static str = "payments";

    fn from_entity(p: &Payment) -> Self {
        Self {
            id: p.id.clone(),
            student_id: p.student_id.to_string(),
            amount: p.amount,
            method: p.method.as_str().to_string(),
            date: p.date.format("%Y-%m-%d").to_string(),
            receipt_number: p.receipt_number.clone(),
            collected_by: p.collected_by.clone(),
        }
    }

    fn into_entity(self) -> RemoteResult<Payment> {
        Ok(Payment {
            id: self.id,
            student_id: parse_student_id(&self.student_id)?,
            amount: self.amount,
            method: self.method.parse()?,
            date: parse_date(&self.date)?,
            receipt_number: self.receipt_number,
            collected_by: self.collected_by,
        })
    }

    fn patch_body(patch: &PaymentPatch) -> Value {
        let mut body = Map::new();
        if let Some(method) = patch.method {
            body.insert("method".into(), json!(method.as_str()));
        }
        if let Some(receipt) = &patch.receipt_number {
            body.insert("receipt_number".into(), json!(receipt));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostelRoomRow {
    pub id: String,
    pub building: String,
    #[serde(default)]
    pub floor: i32,
    pub room_number: String,
    pub capacity: u32,
    #[serde(default)]
    pub occupants: Vec<String>,
    pub status: String,
}

impl TableRow for HostelRoomRow {
    type Entity = HostelRoom;
    type Patch = HostelRoomUpdate;

    const TABLE: &'static str = "hostel_rooms";

    fn from_entity(r: &HostelRoom) -> Self {
        Self {
            id: r.id.clone(),
            building: r.building.clone(),
            floor: r.floor,
            room_number: r.room_number.clone(),
            capacity: r.capacity,
            occupants: r.occupants.iter().map(ToString::to_string).collect(),
            status: r.status.to_string(),
        }
    }

    fn into_entity(self) -> RemoteResult<HostelRoom> {
        let occupants = self
            .occupants
            .iter()
            .map(|raw| parse_student_id(raw))
            .collect::<RemoteResult<Vec<_>>>()?;
        // The backend does not enforce capacity, so its status may disagree
        // with occupancy. It is taken as stored.
        Ok(HostelRoom {
            id: self.id,
            building: self.building,
            floor: self.floor,
            room_number: self.room_number,
            capacity: self.capacity,
            occupants,
            status: self.status.parse()?,
        })
    }

    fn patch_body(patch: &HostelRoomUpdate) -> Value {
        let mut body = Map::new();
        if let Some(v) = &patch.building {
            body.insert("building".into(), json!(v));
        }
        if let Some(v) = patch.floor {
            body.insert("floor".into(), json!(v));
        }
        if let Some(v) = &patch.room_number {
            body.insert("room_number".into(), json!(v));
        }
        if let Some(v) = patch.capacity {
            body.insert("capacity".into(), json!(v));
        }
        if let Some(v) = &patch.occupants {
            let ids: Vec<&str> = v.iter().map(StudentId::as_str).collect();
            body.insert("occupants".into(), json!(ids));
        }
        if let Some(v) = patch.status {
            body.insert("status".into(), json!(v.as_str()));
        }
        Value::Object(body)
    }
}
