// Integration tests for `Controller` against a wiremock API.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roombook_api::ApiClient;
use roombook_core::{
    BookingStatus, BookingView, Controller, ControllerConfig, CoreError, FormMode,
    NewBookingPayload, NoticeLevel, RoomFormPayload, RoomStatus, Section,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let api = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let controller = Controller::with_client(ControllerConfig::default(), api);
    (server, controller)
}

fn rooms_json() -> Value {
    json!([
        {
            "id": "r1", "code": "101", "name": "Lab A", "capacity": 12,
            "equipment": ["tv", "wifi"], "status": "available"
        },
        {
            "id": "r2", "code": "102", "name": "Hall", "capacity": 80,
            "equipment": [], "status": "maintenance"
        }
    ])
}

fn booking_json(id: &str, date: &str, start: &str, status: &str) -> Value {
    json!({
        "id": id,
        "roomCode": "101",
        "roomName": "Lab A",
        "date": date,
        "startTime": start,
        "endTime": "23:00",
        "status": status,
        "organizer": "X"
    })
}

fn bookings_json() -> Value {
    json!([
        booking_json("b1", "2025-03-01", "09:00", "confirmed"),
        booking_json("b2", "2025-03-02", "10:00", "pending"),
    ])
}

async fn mount_lists(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bookings_json()))
        .mount(server)
        .await;
}

async fn loaded() -> (MockServer, Controller) {
    let (server, controller) = setup().await;
    mount_lists(&server).await;
    controller.load().await.unwrap();
    (server, controller)
}

fn booking_payload() -> NewBookingPayload {
    NewBookingPayload {
        room_code: "101".into(),
        room_name: None,
        date: "2025-03-01".into(),
        start_time: "10:00".into(),
        end_time: "11:00".into(),
        organizer: "X".into(),
        note: None,
    }
}

fn room_ids(controller: &Controller) -> Vec<String> {
    controller
        .store()
        .rooms_snapshot()
        .iter()
        .map(|r| r.id.clone())
        .collect()
}

fn booking_ids(controller: &Controller) -> Vec<String> {
    controller
        .store()
        .bookings_snapshot()
        .iter()
        .map(|b| b.id.clone())
        .collect()
}

// ── Initial load ────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_populates_both_collections() {
    let (_server, controller) = loaded().await;

    assert_eq!(room_ids(&controller), vec!["r1", "r2"]);
    assert_eq!(booking_ids(&controller), vec!["b1", "b2"]);
    assert!(!controller.view().loading);
    assert!(controller.store().last_load().is_some());

    let stats = controller.stats();
    assert_eq!(stats.total_rooms, 2);
    assert_eq!(stats.available_rooms, 1);
    assert_eq!(stats.active_bookings, 2);
    assert_eq!(stats.equipment_items, 2);
}

#[tokio::test]
async fn test_load_failure_leaves_both_empty() {
    let (server, controller) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms_json()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let mut notices = controller.subscribe_notices();
    let err = controller.load().await.unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    assert_eq!(controller.store().room_count(), 0);
    assert_eq!(controller.store().booking_count(), 0);
    assert!(!controller.view().loading);

    let notice = notices.try_recv().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
}

async fn mount_failing_bookings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rooms_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "message": "busy" })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_reload_keeps_loaded_data() {
    let (server, controller) = loaded().await;

    server.reset().await;
    mount_failing_bookings(&server).await;

    let mut notices = controller.subscribe_notices();
    let err = controller
        .execute(roombook_core::Command::Reload)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    assert_eq!(room_ids(&controller), vec!["r1", "r2"]);
    assert_eq!(booking_ids(&controller), vec!["b1", "b2"]);
    assert!(!controller.view().loading);
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_failed_reload_keeps_imported_data() {
    let (server, controller) = setup().await;
    mount_failing_bookings(&server).await;

    let document = json!({ "rooms": rooms_json(), "bookings": [] });
    controller.import_json(&document.to_string()).unwrap();

    controller
        .execute(roombook_core::Command::Reload)
        .await
        .unwrap_err();

    assert_eq!(room_ids(&controller), vec!["r1", "r2"]);
    assert!(booking_ids(&controller).is_empty());
}

// ── Rooms ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_room_appends_and_closes_form() {
    let (server, controller) = loaded().await;

    Mock::given(method("POST"))
        .and(path("/api/rooms"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "r3", "code": "303", "name": "Lab C", "capacity": 40,
            "equipment": ["wifi", "board"], "status": "available"
        })))
        .mount(&server)
        .await;

    controller.navigate(Section::Catalog);
    controller.begin_create_room();
    assert_eq!(controller.view().room_mode, FormMode::Create);

    let payload = RoomFormPayload {
        code: "303".into(),
        name: "Lab C".into(),
        capacity: 40,
        equipment: "wifi, board".into(),
        status: RoomStatus::Available,
    };
    let room = controller.submit_room_form(&payload).await.unwrap();

    assert_eq!(room.equipment, vec!["wifi", "board"]);
    assert_eq!(room_ids(&controller), vec!["r1", "r2", "r3"]);
    assert_eq!(controller.view().room_mode, FormMode::List);
}

#[tokio::test]
async fn test_submit_room_form_in_edit_mode_updates() {
    let (server, controller) = loaded().await;

    Mock::given(method("PUT"))
        .and(path("/api/rooms/r2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r2", "code": "102", "name": "Great Hall", "capacity": 90,
            "equipment": ["mic"], "status": "available"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let existing = controller.store().room("r2").unwrap();
    controller.begin_edit_room(&existing);
    assert_eq!(controller.view().room_mode, FormMode::Edit);

    let mut payload = RoomFormPayload::from(existing.as_ref());
    payload.name = "Great Hall".into();
    controller.submit_room_form(&payload).await.unwrap();

    assert_eq!(controller.store().room("r2").unwrap().name, "Great Hall");
    assert_eq!(room_ids(&controller), vec!["r1", "r2"]);
    let view = controller.view();
    assert_eq!(view.room_mode, FormMode::List);
    assert!(view.editing_room.is_none());
}

#[tokio::test]
async fn test_room_rename_keeps_booking_snapshot() {
    let (server, controller) = loaded().await;

    Mock::given(method("PUT"))
        .and(path("/api/rooms/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1", "code": "101", "name": "Renamed", "capacity": 12,
            "equipment": [], "status": "available"
        })))
        .mount(&server)
        .await;

    let payload = RoomFormPayload::from(controller.store().room("r1").unwrap().as_ref());
    controller.update_room("r1", &payload).await.unwrap();

    assert_eq!(controller.store().booking("b1").unwrap().room_name, "Lab A");
}

#[tokio::test]
async fn test_delete_room_removes_locally() {
    let (server, controller) = loaded().await;

    Mock::given(method("DELETE"))
        .and(path("/api/rooms/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    controller.delete_room("r1").await.unwrap();
    assert_eq!(room_ids(&controller), vec!["r2"]);
}

// ── Bookings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_booking_resets_mode_and_view() {
    let (server, controller) = loaded().await;

    Mock::given(method("POST"))
        .and(path("/api/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "b3", "roomCode": "101", "roomName": "Без названия",
            "date": "2025-03-01", "startTime": "10:00", "endTime": "11:00",
            "status": "confirmed", "organizer": "X"
        })))
        .mount(&server)
        .await;

    controller.navigate(Section::Bookings);
    controller.set_booking_view(BookingView::Schedule);
    controller.begin_create_booking();

    let mut notices = controller.subscribe_notices();
    let booking = controller.submit_booking_form(&booking_payload()).await.unwrap();

    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking_ids(&controller), vec!["b1", "b2", "b3"]);
    let view = controller.view();
    assert_eq!(view.booking_mode, FormMode::List);
    assert_eq!(view.booking_view, BookingView::Table);
    assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_update_booking_not_found_leaves_state() {
    let (server, controller) = loaded().await;

    Mock::given(method("PUT"))
        .and(path("/api/bookings/b1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Booking not found" })),
        )
        .mount(&server)
        .await;

    let before = controller.export_document();
    let existing = controller.store().booking("b1").unwrap();
    controller.begin_edit_booking(&existing);

    let mut notices = controller.subscribe_notices();
    let err = controller
        .submit_booking_form(&booking_payload())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(controller.export_document(), before);
    // Form stays open so the user can retry or back out.
    assert_eq!(controller.view().booking_mode, FormMode::Edit);
    let notice = notices.try_recv().unwrap();
    assert!(notice.is_error());
}

#[tokio::test]
async fn test_cancel_booking_keeps_mode() {
    let (server, controller) = loaded().await;

    Mock::given(method("PATCH"))
        .and(path("/api/bookings/b2/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "b2", "roomCode": "101", "roomName": "Lab A",
            "date": "2025-03-02", "startTime": "10:00", "endTime": "23:00",
            "status": "cancelled", "organizer": "X", "note": " (отменено)"
        })))
        .mount(&server)
        .await;

    controller.navigate(Section::Bookings);
    controller.set_booking_view(BookingView::Schedule);

    let booking = controller.cancel_booking("b2").await.unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(
        controller.store().booking("b2").unwrap().status,
        BookingStatus::Cancelled
    );
    assert_eq!(booking_ids(&controller), vec!["b1", "b2"]);
    assert_eq!(controller.view().booking_view, BookingView::Schedule);
    assert_eq!(controller.stats().active_bookings, 1);
}

#[tokio::test]
async fn test_delete_booking_transport_failure_leaves_state() {
    // Bind then drop to get a port nobody listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::from_reqwest(&format!("http://{addr}"), reqwest::Client::new()).unwrap();
    let controller = Controller::with_client(ControllerConfig::default(), api);
    let doc = json!({ "rooms": rooms_json(), "bookings": bookings_json() });
    controller.import_json(&doc.to_string()).unwrap();

    let err = controller.delete_booking("b1").await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    assert_eq!(booking_ids(&controller), vec!["b1", "b2"]);
}

#[tokio::test]
async fn test_execute_routes_commands() {
    let (server, controller) = loaded().await;

    Mock::given(method("DELETE"))
        .and(path("/api/bookings/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    controller
        .execute(roombook_core::Command::DeleteBooking { id: "b1".into() })
        .await
        .unwrap();
    assert_eq!(booking_ids(&controller), vec!["b2"]);
}

// ── Navigation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_navigation_resets_forms() {
    let (_server, controller) = loaded().await;

    let booking = controller.store().booking("b1").unwrap();
    controller.begin_edit_booking(&booking);
    controller.set_booking_view(BookingView::Schedule);
    controller.navigate(Section::Bookings);

    let view = controller.view();
    assert_eq!(view.section, Section::Bookings);
    assert_eq!(view.booking_mode, FormMode::List);
    assert_eq!(view.booking_view, BookingView::Table);
    assert!(view.editing_booking.is_none());

    let room = controller.store().room("r1").unwrap();
    controller.begin_edit_room(&room);
    controller.navigate(Section::Catalog);
    let view = controller.view();
    assert_eq!(view.room_mode, FormMode::List);
    assert!(view.editing_room.is_none());
}

// ── Import / export ─────────────────────────────────────────────────

#[tokio::test]
async fn test_import_missing_bookings_is_rejected() {
    let (_server, controller) = loaded().await;
    let before = controller.export_document();

    let mut notices = controller.subscribe_notices();
    let err = controller
        .import_json(r#"{"rooms": []}"#)
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert_eq!(controller.export_document(), before);
    assert!(notices.try_recv().unwrap().is_error());
}

#[tokio::test]
async fn test_import_with_bad_record_does_not_partially_apply() {
    let (_server, controller) = loaded().await;
    let before = controller.export_document();

    let doc = json!({
        "rooms": [],
        "bookings": [{ "id": "x" }]
    });
    assert!(controller.import_json(&doc.to_string()).is_err());
    assert_eq!(controller.export_document(), before);
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let (server, controller) = loaded().await;
    let before = controller.export_document();
    let exported = controller.export_json().unwrap();
    let requests_before = server.received_requests().await.unwrap().len();

    // Clobber local state, then restore from the export.
    controller.import_json(r#"{"rooms": [], "bookings": []}"#).unwrap();
    assert_eq!(controller.store().room_count(), 0);

    controller.import_json(&exported).unwrap();
    assert_eq!(controller.export_document(), before);

    // Import is local only.
    let requests_after = server.received_requests().await.unwrap().len();
    assert_eq!(requests_before, requests_after);
}

#[tokio::test]
async fn test_export_to_dir_writes_dated_file() {
    let (_server, controller) = loaded().await;
    let dir = tempfile::tempdir().unwrap();

    let path = controller.export_to_dir(dir.path()).await.unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        name,
        roombook_core::export_file_name(chrono::Utc::now().date_naive())
    );

    let imported = Controller::with_client(
        ControllerConfig::default(),
        controller.api().clone(),
    );
    imported.import_file(&path).await.unwrap();
    assert_eq!(imported.export_document(), controller.export_document());
}

#[tokio::test]
async fn test_import_file_missing_is_io_error() {
    let (_server, controller) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    let err = controller
        .import_file(&dir.path().join("nope.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
}
