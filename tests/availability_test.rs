mod common;

use axum::http::StatusCode;
use common::{dt, TestApp};
use onboarding_service::calendar::slots::slot_grid;
use onboarding_service::store::models::{BookedAppointment, CalendarEventMirror};

fn event(id: &str, agent_id: i64, start: &str, end: &str) -> CalendarEventMirror {
    CalendarEventMirror {
        external_event_id: id.to_string(),
        agent_id,
        summary: "Showing".to_string(),
        description: None,
        start_time: dt(start),
        end_time: dt(end),
    }
}

#[tokio::test]
async fn empty_day_has_all_sixteen_grid_slots_open() {
    let app = TestApp::new();

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    resp.assert_status(StatusCode::OK);

    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert_eq!(open, slot_grid());
    assert_eq!(open.len(), 16);
    assert_eq!(open.first().map(String::as_str), Some("09:00"));
    assert_eq!(open.last().map(String::as_str), Some("16:30"));
}

#[tokio::test]
async fn booked_appointment_blocks_its_exact_slot() {
    let app = TestApp::new();
    app.store.seed_booked(BookedAppointment {
        agent_id: 1,
        appointment_time: dt("2026-03-02T09:00:00"),
    });

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    resp.assert_status(StatusCode::OK);
    let json: serde_json::Value = resp.json();
    assert_eq!(json["booked"], serde_json::json!(["09:00"]));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert!(!open.contains(&"09:00".to_string()));
    assert_eq!(open.len(), 15);
}

#[tokio::test]
async fn booked_appointment_uses_its_literal_minute() {
    let app = TestApp::new();
    // 09:10 is not truncated to a grid mark; it occupies the bucket "09:10".
    app.store.seed_booked(BookedAppointment {
        agent_id: 1,
        appointment_time: dt("2026-03-02T09:10:00"),
    });

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    assert_eq!(json["booked"], serde_json::json!(["09:10"]));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert_eq!(open.len(), 16);
}

#[tokio::test]
async fn hour_long_event_occupies_two_buckets() {
    let app = TestApp::new();
    app.store
        .seed_event(event("evt-1", 1, "2026-03-02T10:00:00", "2026-03-02T11:00:00"));

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    assert_eq!(json["booked"], serde_json::json!(["10:00", "10:30"]));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert!(!open.contains(&"10:00".to_string()));
    assert!(!open.contains(&"10:30".to_string()));
    assert_eq!(open.len(), 14);
}

#[tokio::test]
async fn off_grid_event_does_not_block_grid_slots() {
    let app = TestApp::new();
    // Bucket generation starts at the event's own phase: a 10:15–10:45 event
    // occupies only "10:15", which never matches the 10:00/10:30 grid labels.
    // Existing clients depend on these labels, so the phase is not re-aligned.
    app.store
        .seed_event(event("evt-1", 1, "2026-03-02T10:15:00", "2026-03-02T10:45:00"));

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    assert_eq!(json["booked"], serde_json::json!(["10:15"]));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert!(open.contains(&"10:00".to_string()));
    assert!(open.contains(&"10:30".to_string()));
    assert_eq!(open.len(), 16);
}

#[tokio::test]
async fn event_overlapping_from_previous_day_counts() {
    let app = TestApp::new();
    // Starts before the window; the walk still begins at the event's start,
    // so it contributes late-evening labels plus the morning ones.
    app.store
        .seed_event(event("evt-1", 1, "2026-03-01T23:00:00", "2026-03-02T00:30:00"));
    app.store
        .seed_event(event("evt-2", 1, "2026-03-02T08:30:00", "2026-03-02T09:30:00"));

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let booked: Vec<String> = serde_json::from_value(json["booked"].clone()).unwrap();
    assert!(booked.contains(&"23:00".to_string()));
    assert!(booked.contains(&"00:00".to_string()));
    assert!(booked.contains(&"08:30".to_string()));
    assert!(booked.contains(&"09:00".to_string()));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert!(!open.contains(&"09:00".to_string()));
    assert!(open.contains(&"09:30".to_string()));
    assert_eq!(open.len(), 15);
}

#[tokio::test]
async fn open_slots_are_a_unique_subset_of_the_grid() {
    let app = TestApp::new();
    let grid = slot_grid();
    app.store.seed_booked(BookedAppointment {
        agent_id: 1,
        appointment_time: dt("2026-03-02T11:00:00"),
    });
    app.store
        .seed_event(event("evt-1", 1, "2026-03-02T11:00:00", "2026-03-02T12:00:00"));
    app.store
        .seed_event(event("evt-2", 1, "2026-03-02T14:15:00", "2026-03-02T15:45:00"));

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    for slot in &open {
        assert!(grid.contains(slot), "{slot} is not a grid slot");
    }
    let mut deduped = open.clone();
    deduped.dedup();
    assert_eq!(open, deduped);
    // 11:00 is occupied twice over (booking + event) but dropped once.
    assert!(!open.contains(&"11:00".to_string()));
}

#[tokio::test]
async fn slot_queries_are_idempotent() {
    let app = TestApp::new();
    app.store
        .seed_event(event("evt-1", 1, "2026-03-02T10:00:00", "2026-03-02T11:00:00"));

    let first: serde_json::Value = app.get("/calendar/1/openings?date=2026-03-02").await.json();
    let second: serde_json::Value = app.get("/calendar/1/openings?date=2026-03-02").await.json();
    assert_eq!(first, second);
}

#[tokio::test]
async fn other_agents_bookings_do_not_bleed_over() {
    let app = TestApp::new();
    app.store.seed_booked(BookedAppointment {
        agent_id: 2,
        appointment_time: dt("2026-03-02T09:00:00"),
    });
    app.store
        .seed_event(event("evt-1", 2, "2026-03-02T10:00:00", "2026-03-02T11:00:00"));

    let resp = app.get("/calendar/1/booked?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    assert_eq!(json["booked"], serde_json::json!([]));
}

#[tokio::test]
async fn bookings_on_other_days_are_ignored() {
    let app = TestApp::new();
    app.store.seed_booked(BookedAppointment {
        agent_id: 1,
        appointment_time: dt("2026-03-03T09:00:00"),
    });

    let resp = app.get("/calendar/1/openings?date=2026-03-02").await;
    let json: serde_json::Value = resp.json();
    let open: Vec<String> = serde_json::from_value(json["open"].clone()).unwrap();
    assert_eq!(open.len(), 16);
}

#[tokio::test]
async fn missing_or_malformed_date_is_rejected() {
    let app = TestApp::new();

    app.get("/calendar/1/openings")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/calendar/1/openings?date=tomorrow")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.get("/calendar/1/booked?date=03-02-2026")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
