use super::*;
use crate::availability::AvailabilityEngine;
use crate::booking::BookingService;
use crate::clock::FixedClock;
use crate::directory::DirectoryService;
use crate::store::{BookingStore, DirectoryStore, MemoryStore, RepoResult, ScheduleStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use shared::models::{
    Appointment, AppointmentCreate, AppointmentStatus, Client, ClientCreate, Provider,
    ScheduleEntry, ServiceCreate, ServiceKind, ServiceOffering, SlotStatus,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const USER: &str = "5511999990000@c.us";
const OTHER_USER: &str = "5511888880000@c.us";
const SAO_PAULO: chrono_tz::Tz = chrono_tz::America::Sao_Paulo;

/// Booking store that can be switched to fail or stall
#[derive(Debug)]
struct FlakyBookings {
    inner: Arc<MemoryStore>,
    failing: AtomicBool,
    stalling: AtomicBool,
}

impl FlakyBookings {
    async fn gate(&self) -> RepoResult<()> {
        if self.stalling.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(crate::store::RepoError::Database("disk I/O error".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingStore for FlakyBookings {
    async fn insert(&self, data: AppointmentCreate) -> RepoResult<Appointment> {
        self.gate().await?;
        self.inner.insert(data).await
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Appointment>> {
        self.gate().await?;
        self.inner.find_by_id(id).await
    }

    async fn set_status(&self, id: i64, status: AppointmentStatus) -> RepoResult<Appointment> {
        self.gate().await?;
        self.inner.set_status(id, status).await
    }

    async fn move_to(&self, id: i64, when_utc: DateTime<Utc>) -> RepoResult<Appointment> {
        self.gate().await?;
        self.inner.move_to(id, when_utc).await
    }

    async fn active_in_range(
        &self,
        provider_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        self.gate().await?;
        self.inner.active_in_range(provider_id, start, end).await
    }

    async fn list_for_provider(
        &self,
        provider_id: i64,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> RepoResult<Vec<Appointment>> {
        self.gate().await?;
        self.inner.list_for_provider(provider_id, range).await
    }

    async fn active_for_client_from(
        &self,
        client_id: i64,
        from: DateTime<Utc>,
    ) -> RepoResult<Vec<Appointment>> {
        self.gate().await?;
        self.inner.active_for_client_from(client_id, from).await
    }
}

/// Directory whose service catalog can be switched to fail
#[derive(Debug)]
struct FlakyDirectory {
    inner: Arc<MemoryStore>,
    failing_services: AtomicBool,
}

#[async_trait]
impl DirectoryStore for FlakyDirectory {
    async fn find_client(&self, id: i64) -> RepoResult<Option<Client>> {
        self.inner.find_client(id).await
    }

    async fn find_client_by_phone(&self, phone: &str) -> RepoResult<Option<Client>> {
        self.inner.find_client_by_phone(phone).await
    }

    async fn create_client(&self, data: ClientCreate) -> RepoResult<Client> {
        self.inner.create_client(data).await
    }

    async fn client_exists(&self, id: i64) -> RepoResult<bool> {
        self.inner.client_exists(id).await
    }

    async fn provider_exists(&self, id: i64) -> RepoResult<bool> {
        self.inner.provider_exists(id).await
    }

    async fn upsert_provider(&self, id: i64, name: &str) -> RepoResult<Provider> {
        self.inner.upsert_provider(id, name).await
    }

    async fn active_services(&self) -> RepoResult<Vec<ServiceOffering>> {
        if self.failing_services.load(Ordering::SeqCst) {
            return Err(crate::store::RepoError::Database("no such table: service".into()));
        }
        self.inner.active_services().await
    }

    async fn create_service(&self, data: ServiceCreate) -> RepoResult<ServiceOffering> {
        self.inner.create_service(data).await
    }
}

struct Harness {
    engine: ConversationEngine,
    bookings: Arc<BookingService>,
    store: Arc<MemoryStore>,
    flaky: Arc<FlakyBookings>,
    directory: Arc<FlakyDirectory>,
}

impl Harness {
    async fn send(&self, text: &str) -> String {
        self.engine.handle_message(USER, text).await
    }

    async fn state(&self) -> ConversationState {
        self.engine
            .sessions()
            .get(USER)
            .await
            .map(|s| s.state)
            .unwrap_or(ConversationState::Start)
    }

    async fn state_name(&self) -> &'static str {
        self.state().await.name()
    }

    async fn register_other(&self) -> i64 {
        self.store
            .create_client(ClientCreate {
                name: "Bruno".into(),
                phone: "5511888880000".into(),
            })
            .await
            .unwrap()
            .id
    }

    /// Drive a fresh user up to the slot list of Monday 2026-10-19
    async fn reach_time_selection(&self) {
        self.send("oi").await;
        self.send("Ana").await;
        self.send("1").await;
        self.send("1").await;
        assert_eq!(self.state_name().await, "AWAITING_TIME_SELECTION");
    }
}

fn t(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Monday 10:00 in São Paulo
fn monday_local(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, hour + 3, 0, 0).unwrap()
}

/// Provider 1 works Mondays `start..end` with an optional break;
/// "now" is Sunday 2026-10-18 09:00 in São Paulo
async fn create_test_harness(start: u32, end: u32, lunch: Option<(u32, u32)>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    store.upsert_provider(1, "Barbearia").await.unwrap();
    store
        .upsert_entry(ScheduleEntry {
            provider_id: 1,
            weekday: 1,
            active: true,
            start_time: t(start),
            end_time: t(end),
            break_start: lunch.map(|(s, _)| t(s)),
            break_end: lunch.map(|(_, e)| t(e)),
        })
        .await
        .unwrap();

    let flaky = Arc::new(FlakyBookings {
        inner: store.clone(),
        failing: AtomicBool::new(false),
        stalling: AtomicBool::new(false),
    });
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
    ));

    let availability = Arc::new(AvailabilityEngine::new(
        store.clone(),
        flaky.clone(),
        clock.clone(),
        SAO_PAULO,
    ));
    let directory = Arc::new(FlakyDirectory {
        inner: store.clone(),
        failing_services: AtomicBool::new(false),
    });
    let bookings = Arc::new(BookingService::new(
        flaky.clone(),
        directory.clone(),
        clock,
        SAO_PAULO,
    ));
    let engine = ConversationEngine::new(
        availability,
        bookings.clone(),
        Arc::new(DirectoryService::new(directory.clone(), store.clone())),
        Arc::new(InMemorySessionStore::new()),
        EngineSettings {
            call_timeout: Duration::from_millis(100),
            ..Default::default()
        },
    );

    Harness {
        engine,
        bookings,
        store,
        flaky,
        directory,
    }
}

#[tokio::test]
async fn test_first_time_booking_flow() {
    let h = create_test_harness(9, 18, Some((12, 13))).await;

    let reply = h.send("oi").await;
    assert_eq!(reply, messages::ask_name());
    assert_eq!(h.state_name().await, "AWAITING_REGISTRATION_NAME");

    // Too short, then numeric: both re-prompt
    assert_eq!(h.send("A").await, messages::invalid_name());
    assert_eq!(h.send("0").await, messages::invalid_name());
    assert_eq!(h.state_name().await, "AWAITING_REGISTRATION_NAME");

    // Registration skips the main menu
    let reply = h.send("Ana").await;
    assert!(reply.contains("Corte de Cabelo (R$ 50,00)"));
    assert_eq!(h.state_name().await, "AWAITING_SERVICE_SELECTION");

    let reply = h.send("1").await;
    assert!(reply.starts_with("Escolha o dia:\n1 - Seg 19/10\n2 - Seg 26/10"));
    match h.state().await {
        ConversationState::AwaitingDaySelection { dates, service, .. } => {
            // Mondays within 30 days of Sunday 18/10
            assert_eq!(dates.len(), 5);
            assert_eq!(service.kind, ServiceKind::Cut);
        }
        other => panic!("unexpected state {other:?}"),
    }

    let reply = h.send("1").await;
    assert_eq!(reply, messages::slot_list(monday(), &slots_of(&h).await));
    assert!(reply.contains("1 - 09:00\n2 - 10:00\n3 - 11:00\n4 - 13:00"));

    let reply = h.send("2").await;
    assert!(reply.starts_with("Confirma o agendamento?"));
    assert!(reply.contains("Horário: 10:00"));
    assert_eq!(h.state_name().await, "CONFIRMATION");

    let reply = h.send("1").await;
    assert!(reply.starts_with("✅ Agendamento realizado!"));
    assert_eq!(h.state().await, ConversationState::Start);

    let booked = h
        .store
        .active_in_range(1, monday_local(0), monday_local(20))
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].when_utc, monday_local(10));
    assert_eq!(booked[0].status, AppointmentStatus::Pending);
    assert_eq!(booked[0].service, ServiceKind::Cut);
}

async fn slots_of(h: &Harness) -> Vec<shared::models::Slot> {
    match h.state().await {
        ConversationState::AwaitingTimeSelection { slots, .. } => slots,
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn test_returning_client_with_appointment() {
    let h = create_test_harness(9, 18, None).await;
    h.reach_time_selection().await;
    h.send("1").await;
    h.send("1").await;

    // Back at START: any input routes to the existing-appointment menu
    let reply = h.send("bom dia").await;
    assert!(reply.contains("Você já tem um agendamento"));
    assert!(reply.contains("Seg 19/10 às 09:00"));
    assert_eq!(h.state_name().await, "EXISTING_APPOINTMENT_MENU");

    assert!(h.send("9").await.starts_with("Opção inválida."));
    assert_eq!(h.state_name().await, "EXISTING_APPOINTMENT_MENU");

    // Cancel → main menu
    let reply = h.send("3").await;
    assert!(reply.starts_with("Seu agendamento foi cancelado."));
    assert_eq!(h.state_name().await, "MAIN_MENU");
    let client_id = h.state().await.client().unwrap().id;
    assert_eq!(
        h.bookings.get_active_appointment(client_id).await.unwrap(),
        None
    );

    // No appointment left: START goes to the main menu
    let reply = h.send("menu").await;
    assert_eq!(reply, messages::main_menu("Ana"));
    let reply = h.send("2").await;
    assert!(reply.starts_with("Você não tem agendamentos futuros."));
    assert_eq!(h.state_name().await, "MAIN_MENU");

    assert_eq!(h.send("0").await, messages::goodbye());
    assert_eq!(h.state().await, ConversationState::Start);
}

#[tokio::test]
async fn test_reschedule_cancels_then_offers_services() {
    let h = create_test_harness(9, 18, None).await;
    h.reach_time_selection().await;
    h.send("1").await;
    h.send("1").await;
    h.send("oi").await;

    let reply = h.send("2").await;
    assert!(reply.starts_with(&messages::reschedule_intro()));
    assert_eq!(h.state_name().await, "AWAITING_SERVICE_SELECTION");

    // The old 09:00 is free again
    h.send("2").await;
    h.send("1").await;
    let slots = slots_of(&h).await;
    assert!(slots.iter().all(|s| s.is_available()));
}

#[tokio::test]
async fn test_reschedule_with_catalog_down_keeps_appointment() {
    let h = create_test_harness(9, 18, None).await;
    h.reach_time_selection().await;
    h.send("1").await;
    h.send("1").await;
    let menu = h.send("oi").await;
    let client_id = h.state().await.client().unwrap().id;
    let booked = h
        .bookings
        .get_active_appointment(client_id)
        .await
        .unwrap()
        .unwrap();

    h.directory.failing_services.store(true, Ordering::SeqCst);
    assert_eq!(h.send("2").await, messages::technical_error());
    assert_eq!(h.state_name().await, "EXISTING_APPOINTMENT_MENU");
    // Nothing was cancelled, so the menu still tells the truth
    assert_eq!(
        h.bookings.get_active_appointment(client_id).await.unwrap(),
        Some(booked.clone())
    );
    assert!(h.send("9").await.ends_with(&menu));

    h.directory.failing_services.store(false, Ordering::SeqCst);
    let reply = h.send("2").await;
    assert!(reply.starts_with(&messages::reschedule_intro()));
    assert_eq!(
        h.bookings.get_appointment(booked.id).await.unwrap().status,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn test_reset_from_any_state() {
    // Inputs leading from START to each state
    let paths: &[(&[&str], &str)] = &[
        (&["oi"], "AWAITING_REGISTRATION_NAME"),
        (&["oi", "Ana", "0"], "MAIN_MENU"),
        (&["oi", "Ana"], "AWAITING_SERVICE_SELECTION"),
        (&["oi", "Ana", "1"], "AWAITING_DAY_SELECTION"),
        (&["oi", "Ana", "1", "1"], "AWAITING_TIME_SELECTION"),
        (&["oi", "Ana", "1", "1", "1"], "CONFIRMATION"),
        (
            &["oi", "Ana", "1", "1", "1", "1", "oi"],
            "EXISTING_APPOINTMENT_MENU",
        ),
    ];

    for reset in ["olá", "MENU"] {
        for &(inputs, expected) in paths {
            let h = create_test_harness(9, 18, None).await;
            let mut last = String::new();
            for input in inputs {
                last = h.send(input).await;
            }
            assert_eq!(h.state_name().await, expected);

            // Same reply START gives this user right now
            let start_reply = match expected {
                "AWAITING_REGISTRATION_NAME" => messages::ask_name(),
                "EXISTING_APPOINTMENT_MENU" => last,
                _ => messages::main_menu("Ana"),
            };
            let start_state = match expected {
                "AWAITING_REGISTRATION_NAME" | "EXISTING_APPOINTMENT_MENU" => expected,
                _ => "MAIN_MENU",
            };
            assert_eq!(h.send(reset).await, start_reply, "{reset} from {expected}");
            assert_eq!(h.state_name().await, start_state, "{reset} from {expected}");
        }
    }
}

#[tokio::test]
async fn test_back_returns_to_main_menu() {
    let h = create_test_harness(9, 18, None).await;
    h.reach_time_selection().await;
    assert_eq!(h.send("0").await, messages::main_menu("Ana"));

    h.send("1").await;
    assert_eq!(h.state_name().await, "AWAITING_SERVICE_SELECTION");
    assert_eq!(h.send("0").await, messages::main_menu("Ana"));

    h.send("1").await;
    h.send("1").await;
    assert_eq!(h.state_name().await, "AWAITING_DAY_SELECTION");
    assert_eq!(h.send("0").await, messages::main_menu("Ana"));
}

#[tokio::test]
async fn test_invalid_choices_keep_state() {
    let h = create_test_harness(9, 18, None).await;
    h.send("oi").await;
    h.send("Ana").await;

    let before = h.state().await;
    assert!(h.send("7").await.starts_with("Opção inválida."));
    assert!(h.send("abc").await.starts_with("Opção inválida."));
    assert_eq!(h.state().await, before);

    h.send("1").await;
    let before = h.state().await;
    assert!(h.send("6").await.starts_with("Opção inválida."));
    assert_eq!(h.state().await, before);
}

#[tokio::test]
async fn test_occupied_slot_is_never_selected() {
    let h = create_test_harness(9, 18, Some((12, 13))).await;
    let other = h.register_other().await;
    h.bookings
        .create_appointment(1, other, monday_local(10), ServiceKind::Beard)
        .await
        .unwrap();

    h.reach_time_selection().await;
    let slots = slots_of(&h).await;
    assert_eq!(slots[1].status, SlotStatus::Occupied);

    let reply = h.send("2").await;
    assert_eq!(reply, messages::slot_occupied(monday(), &slots));
    assert_eq!(slots_of(&h).await, slots);
}

#[tokio::test]
async fn test_conflict_on_confirmation_refreshes_time_grid() {
    let h = create_test_harness(9, 18, Some((12, 13))).await;
    let other = h.register_other().await;

    h.reach_time_selection().await;
    h.send("2").await;
    assert_eq!(h.state_name().await, "CONFIRMATION");

    // Someone else takes 10:00 between offer and confirmation
    h.bookings
        .create_appointment(1, other, monday_local(10), ServiceKind::Cut)
        .await
        .unwrap();

    let reply = h.send("1").await;
    let slots = slots_of(&h).await;
    assert_eq!(reply, messages::conflict_pick_time(monday(), &slots));
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[1].label(), "10:00");
    assert_eq!(slots[1].status, SlotStatus::Occupied);

    // Only the other client's appointment exists at 10:00
    let booked = h
        .store
        .active_in_range(1, monday_local(0), monday_local(20))
        .await
        .unwrap();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0].client_id, other);
}

#[tokio::test]
async fn test_conflict_with_no_slots_left_goes_to_day_selection() {
    // A single 09:00 slot on Mondays
    let h = create_test_harness(9, 10, None).await;
    let other = h.register_other().await;

    h.reach_time_selection().await;
    h.send("1").await;
    h.bookings
        .create_appointment(1, other, monday_local(9), ServiceKind::Cut)
        .await
        .unwrap();

    let reply = h.send("1").await;
    match h.state().await {
        ConversationState::AwaitingDaySelection { dates, .. } => {
            assert_eq!(reply, messages::conflict_pick_day(&dates));
            assert_eq!(dates[0], monday());
        }
        other => panic!("unexpected state {other:?}"),
    }

    // The full day is now rejected up front
    let reply = h.send("1").await;
    assert!(reply.starts_with("Desculpe, não há horários livres nesse dia."));
    assert_eq!(h.state_name().await, "AWAITING_DAY_SELECTION");

    // Next Monday is bookable
    h.send("2").await;
    assert_eq!(h.state_name().await, "AWAITING_TIME_SELECTION");
}

#[tokio::test]
async fn test_no_working_days_returns_to_main_menu() {
    let h = create_test_harness(9, 18, None).await;
    h.send("oi").await;
    h.send("Ana").await;
    h.store
        .upsert_entry(ScheduleEntry {
            provider_id: 1,
            weekday: 1,
            active: false,
            start_time: t(9),
            end_time: t(18),
            break_start: None,
            break_end: None,
        })
        .await
        .unwrap();

    let reply = h.send("1").await;
    assert_eq!(reply, messages::no_working_days("Ana"));
    assert_eq!(h.state_name().await, "MAIN_MENU");
}

#[tokio::test]
async fn test_failure_keeps_session_and_allows_retry() {
    let h = create_test_harness(9, 18, None).await;
    h.send("oi").await;
    h.send("Ana").await;
    h.send("1").await;
    let before = h.state().await;

    h.flaky.failing.store(true, Ordering::SeqCst);
    let reply = h.send("1").await;
    assert_eq!(reply, messages::technical_error());
    assert!(!reply.contains("disk"));
    assert_eq!(h.state().await, before);

    h.flaky.failing.store(false, Ordering::SeqCst);
    h.send("1").await;
    assert_eq!(h.state_name().await, "AWAITING_TIME_SELECTION");
}

#[tokio::test]
async fn test_stalled_call_times_out() {
    let h = create_test_harness(9, 18, None).await;
    h.send("oi").await;
    h.send("Ana").await;
    h.send("1").await;
    let before = h.state().await;

    h.flaky.stalling.store(true, Ordering::SeqCst);
    let started = std::time::Instant::now();
    let reply = h.send("1").await;
    assert_eq!(reply, messages::technical_error());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(h.state().await, before);
}

#[tokio::test]
async fn test_users_are_independent() {
    let h = create_test_harness(9, 18, None).await;
    h.reach_time_selection().await;

    let reply = h.engine.handle_message(OTHER_USER, "oi").await;
    assert_eq!(reply, messages::ask_name());
    assert_eq!(h.state_name().await, "AWAITING_TIME_SELECTION");
    assert_eq!(h.engine.sessions().count().await, 2);
}
