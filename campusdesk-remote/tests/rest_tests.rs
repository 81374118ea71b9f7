use campusdesk_remote::{
    EntityService, RemoteConfig, RemoteError, RemoteGateway, RestClient, StudentPatch,
};
use campusdesk_types::{
    HostelRoomUpdate, Payment, PaymentMethod, RoomStatus, StudentId, StudentStatus,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-anon-key";

fn gateway(server: &MockServer) -> RemoteGateway {
    let config = RemoteConfig {
        url: server.uri(),
        api_key: KEY.to_string(),
        timeout_secs: 5,
    };
    RestClient::new(&config).unwrap().gateway()
}

fn student_row() -> serde_json::Value {
    json!({
        "id": "row-1",
        "student_id": "stu-1",
        "first_name": "Asha",
        "last_name": "Rao",
        "email": "asha@example.edu",
        "phone": "555-0101",
        "course": "B.Sc Physics",
        "admission_date": "2023-07-01T00:00:00+00:00",
        "status": "active",
        "fee_balance": 5000,
        "hostel_building": "A",
        "hostel_room": "101"
    })
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn client_refuses_unconfigured_backend() {
    let err = RestClient::new(&RemoteConfig::default()).unwrap_err();
    assert!(matches!(err, RemoteError::NotConfigured(_)));
}

#[tokio::test]
async fn service_names_match_tables() {
    let server = MockServer::start().await;
    let gw = gateway(&server);
    assert_eq!(gw.students.name(), "students");
    assert_eq!(gw.payments.name(), "payments");
    assert_eq!(gw.hostel_rooms.name(), "hostel_rooms");
}

// ── list_all ────────────────────────────────────────────────────

#[tokio::test]
async fn list_students_maps_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/students"))
        .and(query_param("select", "*"))
        .and(header("apikey", KEY))
        .and(header("authorization", format!("Bearer {KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([student_row()])))
        .expect(1)
        .mount(&server)
        .await;

    let students = gateway(&server).students.list_all().await.unwrap();
    assert_eq!(students.len(), 1);
    let s = &students[0];
    assert_eq!(s.student_id, StudentId::parse("STU-1").unwrap());
    assert_eq!(s.remote_id.as_deref(), Some("row-1"));
    assert_eq!(s.admission_date, NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
    assert_eq!(s.status, StudentStatus::Active);
    assert_eq!(s.hostel.as_ref().map(|h| h.room.as_str()), Some("101"));
}

#[tokio::test]
async fn list_rooms_keeps_backend_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/hostel_rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "R1",
            "building": "A",
            "floor": 1,
            "room_number": "101",
            "capacity": 2,
            "occupants": ["STU-1", "STU-2"],
            "status": "Available"
        }])))
        .mount(&server)
        .await;

    let rooms = gateway(&server).hostel_rooms.list_all().await.unwrap();
    assert_eq!(rooms[0].occupants.len(), 2);
    assert_eq!(rooms[0].status, RoomStatus::Available);
}

#[tokio::test]
async fn list_with_bad_key_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/payments"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = gateway(&server).payments.list_all().await.unwrap_err();
    assert!(matches!(err, RemoteError::Auth(ref body) if body == "invalid api key"));
}

#[tokio::test]
async fn server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/students"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = gateway(&server).students.list_all().await.unwrap_err();
    assert!(matches!(err, RemoteError::Http { status: 503, .. }));
}

#[tokio::test]
async fn undecodable_row_is_decode_error() {
    let server = MockServer::start().await;
    let mut row = student_row();
    row["status"] = json!("expelled");
    Mock::given(method("GET"))
        .and(path("/rest/v1/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row])))
        .mount(&server)
        .await;

    let err = gateway(&server).students.list_all().await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let config = RemoteConfig {
        url: "http://127.0.0.1:9".to_string(),
        api_key: KEY.to_string(),
        timeout_secs: 2,
    };
    let gw = RestClient::new(&config).unwrap().gateway();
    let err = gw.students.list_all().await.unwrap_err();
    assert!(matches!(err, RemoteError::Network(_)));
}

// ── create ──────────────────────────────────────────────────────

#[tokio::test]
async fn create_payment_posts_row_and_returns_representation() {
    let server = MockServer::start().await;
    let payment = Payment {
        id: "P1".into(),
        student_id: StudentId::parse("STU-1").unwrap(),
        amount: 2000,
        method: PaymentMethod::BankTransfer,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        receipt_number: "RCP-20240601-0000P1".into(),
        collected_by: "cashier".into(),
    };
    let row = json!({
        "id": "P1",
        "student_id": "STU-1",
        "amount": 2000,
        "method": "Bank Transfer",
        "date": "2024-06-01",
        "receipt_number": "RCP-20240601-0000P1",
        "collected_by": "cashier"
    });
    Mock::given(method("POST"))
        .and(path("/rest/v1/payments"))
        .and(header("prefer", "return=representation"))
        .and(body_json(row.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([row])))
        .expect(1)
        .mount(&server)
        .await;

    let created = gateway(&server).payments.create(&payment).await.unwrap();
    assert_eq!(created, payment);
}

#[tokio::test]
async fn create_rejected_by_backend_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/hostel_rooms"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate key"))
        .mount(&server)
        .await;

    let room = campusdesk_types::HostelRoom {
        id: "R1".into(),
        building: "A".into(),
        floor: 1,
        room_number: "101".into(),
        capacity: 2,
        occupants: vec![],
        status: RoomStatus::Available,
    };
    let err = gateway(&server).hostel_rooms.create(&room).await.unwrap_err();
    assert!(matches!(err, RemoteError::Validation(_)));
}

// ── update ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_student_patches_by_row_id() {
    let server = MockServer::start().await;
    let mut updated = student_row();
    updated["status"] = json!("Graduated");
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/students"))
        .and(query_param("id", "eq.row-1"))
        .and(body_json(json!({"status": "Graduated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([updated])))
        .expect(1)
        .mount(&server)
        .await;

    let patch = StudentPatch {
        status: Some(StudentStatus::Graduated),
        ..Default::default()
    };
    let student = gateway(&server)
        .students
        .update("row-1", &patch)
        .await
        .unwrap();
    assert_eq!(student.status, StudentStatus::Graduated);
}

#[tokio::test]
async fn update_unknown_row_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/hostel_rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .hostel_rooms
        .update("nope", &HostelRoomUpdate::status(RoomStatus::Maintenance))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::NotFound(_)));
}
