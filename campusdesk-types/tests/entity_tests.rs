use campusdesk_types::{
    CollectionKind, HostelAssignment, HostelRoom, HostelRoomUpdate, PaymentMethod, RoomStatus,
    Student, StudentId, StudentStatus, StudentUpdate,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sid(s: &str) -> StudentId {
    StudentId::parse(s).unwrap()
}

fn student() -> Student {
    Student {
        student_id: sid("STU-1"),
        remote_id: None,
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.edu".into(),
        phone: "555-0101".into(),
        course: "B.Sc Physics".into(),
        admission_date: NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(),
        status: StudentStatus::Active,
        fee_balance: 5000,
        hostel: None,
        documents: Vec::new(),
        audit: Vec::new(),
    }
}

fn room(capacity: u32, occupants: &[&str]) -> HostelRoom {
    HostelRoom {
        id: "ROOM-1".into(),
        building: "A".into(),
        floor: 1,
        room_number: "101".into(),
        capacity,
        occupants: occupants.iter().map(|s| sid(s)).collect(),
        status: RoomStatus::derive(occupants.len(), capacity),
    }
}

// ── Student ───────────────────────────────────────────────────────

#[test]
fn student_update_merges_only_set_fields() {
    let mut s = student();
    let update = StudentUpdate {
        course: Some("M.Sc Physics".into()),
        status: Some(StudentStatus::Graduated),
        ..Default::default()
    };
    update.apply_to(&mut s);

    assert_eq!(s.course, "M.Sc Physics");
    assert_eq!(s.status, StudentStatus::Graduated);
    assert_eq!(s.first_name, "Asha");
    assert_eq!(s.fee_balance, 5000);
    assert_eq!(update.changed_fields(), vec!["course", "status"]);
}

#[test]
fn student_update_can_clear_hostel() {
    let mut s = student();
    s.hostel = Some(HostelAssignment {
        building: "A".into(),
        room: "101".into(),
    });
    StudentUpdate {
        hostel: Some(None),
        ..Default::default()
    }
    .apply_to(&mut s);
    assert_eq!(s.hostel, None);
}

#[test]
fn empty_update_is_empty() {
    assert!(StudentUpdate::default().is_empty());
}

#[test]
fn student_snapshot_uses_camel_case_and_round_trips() {
    let mut s = student();
    s.record_audit("admin", "created");
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["studentId"], "STU-1");
    assert_eq!(json["feeBalance"], 5000);
    assert!(json.get("remoteId").is_none());

    let back: Student = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn status_and_method_parse_loosely() {
    assert_eq!("graduated".parse::<StudentStatus>().unwrap(), StudentStatus::Graduated);
    assert_eq!("Bank Transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
    assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
    assert!("barter".parse::<PaymentMethod>().is_err());
}

// ── Hostel rooms ──────────────────────────────────────────────────

#[test]
fn explicit_status_wins_over_derived_full() {
    let mut r = room(2, &["STU-1", "STU-2"]);
    assert_eq!(r.status, RoomStatus::Full);

    HostelRoomUpdate::status(RoomStatus::Maintenance)
        .apply_to(&mut r)
        .unwrap();
    assert_eq!(r.status, RoomStatus::Maintenance);
    assert_eq!(r.occupants.len(), 2);
}

#[test]
fn occupant_change_rederives_status() {
    let mut r = room(2, &["STU-1"]);
    HostelRoomUpdate::occupants(vec![sid("STU-1"), sid("STU-2")])
        .apply_to(&mut r)
        .unwrap();
    assert_eq!(r.status, RoomStatus::Full);
}

#[test]
fn maintenance_survives_occupant_change() {
    let mut r = room(3, &["STU-1"]);
    r.status = RoomStatus::Maintenance;
    HostelRoomUpdate::occupants(vec![]).apply_to(&mut r).unwrap();
    assert_eq!(r.status, RoomStatus::Maintenance);
}

#[test]
fn over_capacity_update_is_refused_untouched() {
    let mut r = room(1, &["STU-1"]);
    let before = r.clone();
    let err = HostelRoomUpdate::occupants(vec![sid("STU-1"), sid("STU-2")])
        .apply_to(&mut r)
        .unwrap_err();
    assert!(err.contains("ROOM-1"));
    assert_eq!(r, before);
}

#[test]
fn shrinking_capacity_below_occupancy_is_refused() {
    let mut r = room(3, &["STU-1", "STU-2"]);
    let update = HostelRoomUpdate {
        capacity: Some(1),
        ..Default::default()
    };
    assert!(update.apply_to(&mut r).is_err());
    assert_eq!(r.capacity, 3);
}

#[test]
fn zero_capacity_is_refused() {
    let mut r = room(2, &[]);
    let update = HostelRoomUpdate {
        capacity: Some(0),
        ..Default::default()
    };
    assert!(update.apply_to(&mut r).is_err());
}

#[test]
fn exams_are_the_only_locally_only_collection() {
    let local_only: Vec<_> = CollectionKind::ALL
        .into_iter()
        .filter(|k| !k.is_remote_backed())
        .collect();
    assert_eq!(local_only, vec![CollectionKind::Exams]);
}

proptest! {
    /// Derived status is Full exactly when occupancy reaches capacity.
    #[test]
    fn derived_status_full_iff_at_capacity(capacity in 1u32..8, occupants in 0usize..8) {
        prop_assume!(occupants <= capacity as usize);
        let status = RoomStatus::derive(occupants, capacity);
        prop_assert_eq!(status == RoomStatus::Full, occupants == capacity as usize);
        prop_assert_eq!(status == RoomStatus::Available, occupants == 0);
    }

    /// Any accepted occupant update keeps occupants within capacity.
    #[test]
    fn accepted_updates_respect_capacity(capacity in 1u32..6, count in 0usize..10) {
        let mut r = room(capacity, &[]);
        let occupants: Vec<StudentId> = (0..count).map(|i| sid(&format!("STU-{i}"))).collect();
        let result = HostelRoomUpdate::occupants(occupants).apply_to(&mut r);
        prop_assert_eq!(result.is_ok(), count <= capacity as usize);
        prop_assert!(r.occupants.len() <= r.capacity as usize);
    }

    /// Normalization is idempotent.
    #[test]
    fn student_id_parse_is_idempotent(raw in "[a-zA-Z]{2,4}-[0-9]{1,5}") {
        let once = StudentId::parse(&raw).unwrap();
        let twice = StudentId::parse(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
