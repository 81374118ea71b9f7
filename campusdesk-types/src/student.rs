use crate::StudentId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

impl StudentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Graduated => "Graduated",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "graduated" => Ok(Self::Graduated),
            _ => Err(crate::Error::UnknownVariant {
                kind: "student status",
                value: s.to_string(),
            }),
        }
    }
}

/// Building and room a student is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostelAssignment {
    pub building: String,
    pub room: String,
}

/// A reference to an uploaded document (the file itself lives elsewhere).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
}

/// One line of a student's append-only audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: String,
    pub at: DateTime<Utc>,
    pub action: String,
}

/// A student record.
///
/// `fee_balance` is the authoritative outstanding amount in whole currency
/// units. It is decremented once for every payment recorded against the
/// student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: StudentId,
    /// Row identifier assigned by the remote backend, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub admission_date: NaiveDate,
    pub status: StudentStatus,
    pub fee_balance: i64,
    #[serde(default)]
    pub hostel: Option<HostelAssignment>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    #[serde(default)]
    pub audit: Vec<AuditEntry>,
}

impl Student {
    /// Returns "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Appends an audit entry stamped with the current time.
    pub fn record_audit(&mut self, actor: &str, action: impl Into<String>) {
        self.audit.push(AuditEntry {
            actor: actor.to_string(),
            at: Utc::now(),
            action: action.into(),
        });
    }
}

/// A partial update to a student. `None` leaves a field untouched.
///
/// `hostel` is doubly optional: `Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub status: Option<StudentStatus>,
    pub fee_balance: Option<i64>,
    pub hostel: Option<Option<HostelAssignment>>,
    pub documents: Option<Vec<DocumentRef>>,
}

impl StudentUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this update sets, in declaration order.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.first_name.is_some() {
            fields.push("firstName");
        }
        if self.last_name.is_some() {
            fields.push("lastName");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.phone.is_some() {
            fields.push("phone");
        }
        if self.course.is_some() {
            fields.push("course");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.fee_balance.is_some() {
            fields.push("feeBalance");
        }
        if self.hostel.is_some() {
            fields.push("hostel");
        }
        if self.documents.is_some() {
            fields.push("documents");
        }
        fields
    }

    /// Merges the set fields into `student`.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(v) = &self.first_name {
            student.first_name.clone_from(v);
        }
        if let Some(v) = &self.last_name {
            student.last_name.clone_from(v);
        }
        if let Some(v) = &self.email {
            student.email.clone_from(v);
        }
        if let Some(v) = &self.phone {
            student.phone.clone_from(v);
        }
        if let Some(v) = &self.course {
            student.course.clone_from(v);
        }
        if let Some(v) = self.status {
            student.status = v;
        }
        if let Some(v) = self.fee_balance {
            student.fee_balance = v;
        }
        if let Some(v) = &self.hostel {
            student.hostel.clone_from(v);
        }
        if let Some(v) = &self.documents {
            student.documents.clone_from(v);
        }
    }
}
