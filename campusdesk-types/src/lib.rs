//! Core type definitions for the CampusDesk data layer.
//!
//! This crate defines the entities the data layer owns and the small
//! helpers that keep their identifiers and dates consistent:
//! - Students, payments, hostel rooms, exams and notifications
//! - Student identifiers and generated record identifiers
//! - Date normalization for values coming from the remote backend
//! - `CollectionKind`, which marks each collection as remote-backed or
//!   locally-only
//!
//! Nothing here performs I/O.

mod collection;
mod date;
mod exam;
mod hostel;
mod ids;
mod notification;
mod payment;
mod student;

pub use collection::CollectionKind;
pub use date::{parse_date, parse_timestamp};
pub use exam::Exam;
pub use hostel::{HostelRoom, HostelRoomUpdate, RoomStatus};
pub use ids::{StudentId, new_record_id, receipt_number};
pub use notification::{NotificationItem, Severity};
pub use payment::{Payment, PaymentMethod};
pub use student::{
    AuditEntry, DocumentRef, HostelAssignment, Student, StudentStatus, StudentUpdate,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing identifiers and dates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid student id: {0:?}")]
    InvalidStudentId(String),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("unknown {kind} value: {value:?}")]
    UnknownVariant { kind: &'static str, value: String },
}
