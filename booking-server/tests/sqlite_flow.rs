//! End-to-end flows against a file-backed SQLite database

use booking_server::core::Stores;
use booking_server::db::DbService;
use booking_server::{Config, FixedClock, ServerState};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use shared::models::{AppointmentStatus, ScheduleEntry, ServiceKind, SlotStatus};
use std::sync::Arc;
use tempfile::TempDir;

const USER: &str = "5511977770000@c.us";

/// Monday 2026-10-19 HH:00 in São Paulo (UTC-3)
fn monday_at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour + 3, 0, 0).unwrap()
}

async fn create_test_state() -> (ServerState, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("booking.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();

    let mut config = Config::with_overrides(path.to_string_lossy(), 0);
    config.provider_id = 1;
    config.timezone = chrono_tz::America::Sao_Paulo;
    config.booking_horizon_days = 30;
    config.max_offered_days = 8;
    config.external_call_timeout_ms = 5000;

    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
    ));
    let state = ServerState::build(config, Stores::sqlite(&db), clock);
    state.directory.ensure_provider(1, "Barbearia").await.unwrap();
    state
        .directory
        .upsert_schedule_entry(ScheduleEntry {
            provider_id: 1,
            weekday: 1,
            active: true,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            break_start: NaiveTime::from_hms_opt(12, 0, 0),
            break_end: NaiveTime::from_hms_opt(13, 0, 0),
        })
        .await
        .unwrap();
    (state, dir)
}

#[tokio::test]
async fn test_concurrent_bookings_single_winner() {
    let (state, _dir) = create_test_state().await;
    let ana = state.directory.create_client("Ana", "5511999990000").await.unwrap();
    let bia = state.directory.create_client("Bia", "5511888880000").await.unwrap();

    let (a, b) = tokio::join!(
        state
            .bookings
            .create_appointment(1, ana.id, monday_at(10), ServiceKind::Cut),
        state
            .bookings
            .create_appointment(1, bia.id, monday_at(10), ServiceKind::Beard),
    );

    let outcomes = [a, b];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    let loser = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(loser.is_conflict());

    let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let slots = state
        .availability
        .get_slots_for_date(1, date)
        .await
        .unwrap();
    let ten = slots.iter().find(|s| s.label() == "10:00").unwrap();
    assert_eq!(ten.status, SlotStatus::Occupied);
}

#[tokio::test]
async fn test_cancelled_slot_can_be_rebooked() {
    let (state, _dir) = create_test_state().await;
    let ana = state.directory.create_client("Ana", "5511999990000").await.unwrap();

    let first = state
        .bookings
        .create_appointment(1, ana.id, monday_at(9), ServiceKind::Cut)
        .await
        .unwrap();
    state.bookings.cancel_appointment(first.id).await.unwrap();

    let second = state
        .bookings
        .create_appointment(1, ana.id, monday_at(9), ServiceKind::Cut)
        .await
        .unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(
        state.bookings.get_appointment(first.id).await.unwrap().status,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn test_conversation_books_through_sqlite() {
    let (state, _dir) = create_test_state().await;
    let engine = &state.conversation;

    engine.handle_message(USER, "oi").await;
    engine.handle_message(USER, "Carla").await;
    // Service, first Monday, second slot (10:00), confirm
    engine.handle_message(USER, "1").await;
    engine.handle_message(USER, "1").await;
    engine.handle_message(USER, "2").await;
    let reply = engine.handle_message(USER, "1").await;
    assert!(reply.starts_with("✅ Agendamento realizado!"));

    let client = state
        .directory
        .find_client_by_phone(USER)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.name, "Carla");

    let future = state.bookings.get_future_appointments(client.id).await.unwrap();
    assert_eq!(future.len(), 1);
    assert_eq!(future[0].when_utc, monday_at(10));
    assert_eq!(future[0].status, AppointmentStatus::Pending);

    // Next greeting lands on the existing-appointment menu
    let reply = engine.handle_message(USER, "olá").await;
    assert!(reply.contains("19/10"));
}
