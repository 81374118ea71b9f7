//! Built-in demo dataset.
//!
//! Substituted for a collection whenever no other source is available: no
//! stored snapshot in local-only mode, or an empty/failed fetch in
//! remote-backed mode. Every call returns identical values.

use campusdesk_types::{
    AuditEntry, DocumentRef, Exam, HostelAssignment, HostelRoom, Payment, PaymentMethod,
    RoomStatus, Student, StudentId, StudentStatus,
};
use chrono::{DateTime, NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn morning_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_opt(9, 0, 0).unwrap_or_default().and_utc()
}

fn sid(raw: &str) -> StudentId {
    // Demo ids are literals known to be valid.
    StudentId::parse(raw).unwrap_or_else(|_| unreachable!("invalid demo student id {raw}"))
}

fn hostel(building: &str, room: &str) -> Option<HostelAssignment> {
    Some(HostelAssignment {
        building: building.to_string(),
        room: room.to_string(),
    })
}

#[allow(clippy::too_many_arguments)]
fn student(
    n: u32,
    first: &str,
    last: &str,
    course: &str,
    admitted: NaiveDate,
    status: StudentStatus,
    fee_balance: i64,
    hostel: Option<HostelAssignment>,
) -> Student {
    Student {
        student_id: sid(&format!("STU-{n}")),
        remote_id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@campus.example.edu", first, last).to_ascii_lowercase(),
        phone: format!("555-01{n:02}"),
        course: course.to_string(),
        admission_date: admitted,
        status,
        fee_balance,
        hostel,
        documents: Vec::new(),
        audit: vec![AuditEntry {
            actor: "system".to_string(),
            at: morning_of(admitted),
            action: "created".to_string(),
        }],
    }
}

pub fn students() -> Vec<Student> {
    let mut list = vec![
        student(
            1,
            "Asha",
            "Rao",
            "B.Sc Computer Science",
            date(2023, 7, 15),
            StudentStatus::Active,
            5000,
            None,
        ),
        student(
            2,
            "Daniel",
            "Okafor",
            "B.Com",
            date(2023, 7, 18),
            StudentStatus::Active,
            12000,
            hostel("A", "101"),
        ),
        student(
            3,
            "Mei",
            "Lin",
            "B.Sc Computer Science",
            date(2022, 7, 20),
            StudentStatus::Active,
            0,
            hostel("A", "101"),
        ),
        student(
            4,
            "Carlos",
            "Mendes",
            "BBA",
            date(2022, 8, 2),
            StudentStatus::Inactive,
            7500,
            hostel("A", "102"),
        ),
        student(
            5,
            "Fatima",
            "Khan",
            "B.Com",
            date(2020, 7, 10),
            StudentStatus::Graduated,
            0,
            None,
        ),
    ];
    list[0].documents.push(DocumentRef {
        name: "Transfer certificate".to_string(),
        url: "documents/STU-1/transfer-certificate.pdf".to_string(),
    });
    list
}

fn payment(id: &str, student: &str, amount: i64, method: PaymentMethod, on: NaiveDate) -> Payment {
    Payment {
        id: id.to_string(),
        student_id: sid(student),
        amount,
        method,
        date: on,
        receipt_number: campusdesk_types::receipt_number(on, id),
        collected_by: "accounts".to_string(),
    }
}

pub fn payments() -> Vec<Payment> {
    vec![
        payment("PAY-1", "STU-2", 8000, PaymentMethod::BankTransfer, date(2024, 1, 10)),
        payment("PAY-2", "STU-3", 15000, PaymentMethod::Upi, date(2024, 1, 12)),
        payment("PAY-3", "STU-4", 2500, PaymentMethod::Cash, date(2024, 2, 3)),
    ]
}

fn room(
    id: &str,
    building: &str,
    floor: i32,
    number: &str,
    capacity: u32,
    occupants: &[&str],
    status: RoomStatus,
) -> HostelRoom {
    HostelRoom {
        id: id.to_string(),
        building: building.to_string(),
        floor,
        room_number: number.to_string(),
        capacity,
        occupants: occupants.iter().map(|o| sid(o)).collect(),
        status,
    }
}

pub fn hostel_rooms() -> Vec<HostelRoom> {
    vec![
        room("ROOM-A101", "A", 1, "101", 2, &["STU-2", "STU-3"], RoomStatus::Full),
        room("ROOM-A102", "A", 1, "102", 3, &["STU-4"], RoomStatus::Occupied),
        room("ROOM-B201", "B", 2, "201", 2, &[], RoomStatus::Available),
        room("ROOM-B202", "B", 2, "202", 2, &[], RoomStatus::Maintenance),
    ]
}

pub fn exams() -> Vec<Exam> {
    let subjects = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    vec![
        Exam {
            id: "EXAM-1".to_string(),
            name: "Mid-semester".to_string(),
            course: "B.Sc Computer Science".to_string(),
            date: date(2024, 10, 7),
            subjects: subjects(&["Data Structures", "Discrete Mathematics"]),
            published: true,
        },
        Exam {
            id: "EXAM-2".to_string(),
            name: "Mid-semester".to_string(),
            course: "B.Com".to_string(),
            date: date(2024, 10, 9),
            subjects: subjects(&["Financial Accounting", "Business Law"]),
            published: true,
        },
        Exam {
            id: "EXAM-3".to_string(),
            name: "End-semester".to_string(),
            course: "BBA".to_string(),
            date: date(2024, 12, 2),
            subjects: subjects(&["Marketing", "Organisational Behaviour", "Statistics"]),
            published: false,
        },
    ]
}
