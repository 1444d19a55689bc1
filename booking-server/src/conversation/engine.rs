//! Conversation Engine
//!
//! One state machine per chat user. A turn loads the session, applies the
//! global reset, dispatches on the current state and writes the next state
//! back. Turns are transactional: when a call fails for any reason other
//! than a lost slot race, the session is left exactly as it was and the user
//! gets a generic apology.

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use shared::models::{Appointment, Client, ServiceOffering, Slot};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::input::Input;
use super::messages;
use super::session::SessionStore;
use super::state::{ConversationState, Session};
use crate::availability::AvailabilityEngine;
use crate::booking::BookingService;
use crate::directory::DirectoryService;
use crate::utils::time::local_to_utc;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Tunables for the dialogue
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Provider whose calendar the chat books
    pub provider_id: i64,
    /// `get_working_days` horizon
    pub horizon_days: u32,
    /// Dates offered in day selection
    pub max_offered_days: usize,
    /// Bound on each availability/booking/directory call
    pub call_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            provider_id: 1,
            horizon_days: 30,
            max_offered_days: 8,
            call_timeout: Duration::from_secs(5),
        }
    }
}

/// Next state plus the reply to send
struct Turn {
    next: ConversationState,
    reply: String,
}

impl Turn {
    fn new(next: ConversationState, reply: String) -> Self {
        Self { next, reply }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationEngine {
    availability: Arc<AvailabilityEngine>,
    bookings: Arc<BookingService>,
    directory: Arc<DirectoryService>,
    sessions: Arc<dyn SessionStore>,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        availability: Arc<AvailabilityEngine>,
        bookings: Arc<BookingService>,
        directory: Arc<DirectoryService>,
        sessions: Arc<dyn SessionStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            availability,
            bookings,
            directory,
            sessions,
            settings,
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Process one inbound message and return the reply
    ///
    /// Messages of one user must be delivered sequentially.
    pub async fn handle_message(&self, user_id: &str, text: &str) -> String {
        let current = self
            .sessions
            .get(user_id)
            .await
            .map(|session| session.state)
            .unwrap_or(ConversationState::Start);

        let input = Input::parse(text);
        let state = if input == Input::Reset {
            ConversationState::Start
        } else {
            current
        };
        let from = state.name();

        match self.step(user_id, state, input).await {
            Ok(turn) => {
                tracing::debug!(user_id, from, to = turn.next.name(), "Conversation transition");
                self.sessions
                    .put(Session::with_state(user_id, turn.next))
                    .await;
                turn.reply
            }
            Err(err) => {
                tracing::error!(
                    user_id,
                    state = from,
                    code = %err.code,
                    retryable = err.is_retryable(),
                    error = %err,
                    "Conversation turn failed, session left unchanged"
                );
                messages::technical_error()
            }
        }
    }

    async fn step(&self, user_id: &str, state: ConversationState, input: Input) -> AppResult<Turn> {
        use ConversationState::*;

        match state {
            Start => self.start(user_id).await,
            AwaitingRegistrationName => self.register(user_id, input).await,
            MainMenu { client } => self.main_menu(client, input).await,
            ExistingAppointmentMenu {
                client,
                appointment,
            } => self.existing_appointment(client, appointment, input).await,
            AwaitingServiceSelection { client, services } => {
                self.select_service(client, services, input).await
            }
            AwaitingDaySelection {
                client,
                service,
                dates,
            } => self.select_day(client, service, dates, input).await,
            AwaitingTimeSelection {
                client,
                service,
                dates,
                date,
                slots,
            } => Ok(Self::select_time(client, service, dates, date, slots, input)),
            Confirmation {
                client,
                service,
                dates,
                date,
                time,
            } => self.confirm(client, service, dates, date, time, input).await,
        }
    }

    // ========== States ==========

    async fn start(&self, user_id: &str) -> AppResult<Turn> {
        let client = self
            .call("find_client", self.directory.find_client_by_phone(user_id))
            .await?;
        let Some(client) = client else {
            return Ok(Turn::new(
                ConversationState::AwaitingRegistrationName,
                messages::ask_name(),
            ));
        };

        let active = self
            .call(
                "get_active_appointment",
                self.bookings.get_active_appointment(client.id),
            )
            .await?;
        Ok(match active {
            Some(appointment) => {
                let reply = self.existing_menu_reply(&client, &appointment);
                Turn::new(
                    ConversationState::ExistingAppointmentMenu {
                        client,
                        appointment,
                    },
                    reply,
                )
            }
            None => Self::to_main_menu(client),
        })
    }

    async fn register(&self, user_id: &str, input: Input) -> AppResult<Turn> {
        // Numeric replies are menu choices, not names
        let Input::Text(raw) = input else {
            return Ok(Turn::new(
                ConversationState::AwaitingRegistrationName,
                messages::invalid_name(),
            ));
        };

        let client = match self
            .call("create_client", self.directory.create_client(&raw, user_id))
            .await
        {
            Ok(client) => client,
            Err(e) if e.code == ErrorCode::InvalidClientName => {
                return Ok(Turn::new(
                    ConversationState::AwaitingRegistrationName,
                    messages::invalid_name(),
                ));
            }
            // Registered meanwhile (another device, API): continue with that record
            Err(e) if e.code == ErrorCode::ClientAlreadyExists => self
                .call("find_client", self.directory.find_client_by_phone(user_id))
                .await?
                .ok_or(e)?,
            Err(e) => return Err(e),
        };

        let services = self.call("list_services", self.directory.list_services()).await?;
        let reply = messages::registered(&client.name, &services);
        Ok(Turn::new(
            ConversationState::AwaitingServiceSelection { client, services },
            reply,
        ))
    }

    async fn main_menu(&self, client: Client, input: Input) -> AppResult<Turn> {
        match input {
            Input::Choice(1) => self.to_service_selection(client).await,
            Input::Choice(2) => {
                let future = self
                    .call(
                        "get_future_appointments",
                        self.bookings.get_future_appointments(client.id),
                    )
                    .await?;
                let tz = self.tz();
                let listed: Vec<_> = future
                    .iter()
                    .map(|a| {
                        let local = a.when_utc.with_timezone(&tz);
                        (local.date_naive(), local.time(), a.service)
                    })
                    .collect();
                let reply = messages::future_appointments(&client.name, &listed);
                Ok(Turn::new(ConversationState::MainMenu { client }, reply))
            }
            Input::Choice(0) => Ok(Turn::new(ConversationState::Start, messages::goodbye())),
            _ => {
                let reply = messages::invalid_option(&messages::main_menu(&client.name));
                Ok(Turn::new(ConversationState::MainMenu { client }, reply))
            }
        }
    }

    async fn existing_appointment(
        &self,
        client: Client,
        appointment: Appointment,
        input: Input,
    ) -> AppResult<Turn> {
        match input {
            Input::Choice(0) => Ok(Self::to_main_menu(client)),
            Input::Choice(1) => Ok(Turn::new(
                ConversationState::Start,
                messages::appointment_kept(),
            )),
            Input::Choice(2) => {
                // Catalog first: a failed lookup must leave the appointment in place
                let services = self.call("list_services", self.directory.list_services()).await?;
                self.cancel(appointment.id).await?;
                Ok(Self::service_selection(
                    client,
                    services,
                    Some(messages::reschedule_intro()),
                ))
            }
            Input::Choice(3) => {
                self.cancel(appointment.id).await?;
                let reply = messages::appointment_cancelled(&client.name);
                Ok(Turn::new(ConversationState::MainMenu { client }, reply))
            }
            Input::Choice(4) => self.to_service_selection(client).await,
            _ => {
                let reply =
                    messages::invalid_option(&self.existing_menu_reply(&client, &appointment));
                Ok(Turn::new(
                    ConversationState::ExistingAppointmentMenu {
                        client,
                        appointment,
                    },
                    reply,
                ))
            }
        }
    }

    async fn select_service(
        &self,
        client: Client,
        services: Vec<ServiceOffering>,
        input: Input,
    ) -> AppResult<Turn> {
        if input.is_back() {
            return Ok(Self::to_main_menu(client));
        }
        let Some(index) = input.index_within(services.len()) else {
            let reply = messages::invalid_option(&messages::service_list(&services));
            return Ok(Turn::new(
                ConversationState::AwaitingServiceSelection { client, services },
                reply,
            ));
        };

        let service = services[index].clone();
        let mut dates = self
            .call(
                "get_working_days",
                self.availability
                    .get_working_days(self.settings.provider_id, self.settings.horizon_days),
            )
            .await?;
        dates.truncate(self.settings.max_offered_days);

        if dates.is_empty() {
            tracing::info!(client_id = client.id, "No working days to offer");
            let reply = messages::no_working_days(&client.name);
            return Ok(Turn::new(ConversationState::MainMenu { client }, reply));
        }

        let reply = messages::day_list(&dates);
        Ok(Turn::new(
            ConversationState::AwaitingDaySelection {
                client,
                service,
                dates,
            },
            reply,
        ))
    }

    async fn select_day(
        &self,
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        input: Input,
    ) -> AppResult<Turn> {
        if input.is_back() {
            return Ok(Self::to_main_menu(client));
        }
        let Some(index) = input.index_within(dates.len()) else {
            let reply = messages::invalid_option(&messages::day_list(&dates));
            return Ok(Turn::new(
                ConversationState::AwaitingDaySelection {
                    client,
                    service,
                    dates,
                },
                reply,
            ));
        };

        let date = dates[index];
        let slots = self.slots_for(date).await?;
        if !slots.iter().any(Slot::is_available) {
            let reply = messages::day_unavailable(&dates);
            return Ok(Turn::new(
                ConversationState::AwaitingDaySelection {
                    client,
                    service,
                    dates,
                },
                reply,
            ));
        }

        let reply = messages::slot_list(date, &slots);
        Ok(Turn::new(
            ConversationState::AwaitingTimeSelection {
                client,
                service,
                dates,
                date,
                slots,
            },
            reply,
        ))
    }

    fn select_time(
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        date: NaiveDate,
        slots: Vec<Slot>,
        input: Input,
    ) -> Turn {
        if input.is_back() {
            return Self::to_main_menu(client);
        }
        let chosen = input.index_within(slots.len()).map(|i| slots[i]);
        match chosen {
            Some(slot) if slot.is_available() => {
                let reply = messages::confirmation(&service, date, slot.time);
                Turn::new(
                    ConversationState::Confirmation {
                        client,
                        service,
                        dates,
                        date,
                        time: slot.time,
                    },
                    reply,
                )
            }
            chosen => {
                let reply = match chosen {
                    Some(_) => messages::slot_occupied(date, &slots),
                    None => messages::invalid_option(&messages::slot_list(date, &slots)),
                };
                Turn::new(
                    ConversationState::AwaitingTimeSelection {
                        client,
                        service,
                        dates,
                        date,
                        slots,
                    },
                    reply,
                )
            }
        }
    }

    async fn confirm(
        &self,
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        date: NaiveDate,
        time: NaiveTime,
        input: Input,
    ) -> AppResult<Turn> {
        match input {
            Input::Choice(0) | Input::Choice(2) => {
                let reply = messages::not_confirmed(&client.name);
                Ok(Turn::new(ConversationState::MainMenu { client }, reply))
            }
            Input::Choice(1) => {
                let when_utc = local_to_utc(date, time, self.tz());
                let created = self
                    .call(
                        "create_appointment",
                        self.bookings.create_appointment(
                            self.settings.provider_id,
                            client.id,
                            when_utc,
                            service.kind,
                        ),
                    )
                    .await;

                match created {
                    Ok(appointment) => {
                        tracing::info!(
                            client_id = client.id,
                            appointment_id = appointment.id,
                            "Booked via chat"
                        );
                        Ok(Turn::new(
                            ConversationState::Start,
                            messages::booked(&service, date, time),
                        ))
                    }
                    Err(e) if e.is_conflict() || e.code == ErrorCode::AppointmentInPast => {
                        tracing::warn!(
                            client_id = client.id,
                            %date,
                            time = %time,
                            code = %e.code,
                            "Offered slot no longer bookable, refreshing grid"
                        );
                        self.recover_lost_slot(client, service, dates, date).await
                    }
                    Err(e) => Err(e),
                }
            }
            _ => {
                let reply = messages::invalid_option(&messages::confirmation(&service, date, time));
                Ok(Turn::new(
                    ConversationState::Confirmation {
                        client,
                        service,
                        dates,
                        date,
                        time,
                    },
                    reply,
                ))
            }
        }
    }

    /// Re-query the chosen day after a lost race
    async fn recover_lost_slot(
        &self,
        client: Client,
        service: ServiceOffering,
        dates: Vec<NaiveDate>,
        date: NaiveDate,
    ) -> AppResult<Turn> {
        let slots = self.slots_for(date).await?;
        if slots.iter().any(Slot::is_available) {
            let reply = messages::conflict_pick_time(date, &slots);
            return Ok(Turn::new(
                ConversationState::AwaitingTimeSelection {
                    client,
                    service,
                    dates,
                    date,
                    slots,
                },
                reply,
            ));
        }

        let reply = messages::conflict_pick_day(&dates);
        Ok(Turn::new(
            ConversationState::AwaitingDaySelection {
                client,
                service,
                dates,
            },
            reply,
        ))
    }

    // ========== Helpers ==========

    async fn to_service_selection(&self, client: Client) -> AppResult<Turn> {
        let services = self.call("list_services", self.directory.list_services()).await?;
        Ok(Self::service_selection(client, services, None))
    }

    fn service_selection(
        client: Client,
        services: Vec<ServiceOffering>,
        intro: Option<String>,
    ) -> Turn {
        let list = messages::service_list(&services);
        let reply = match intro {
            Some(intro) => format!("{intro}\n\n{list}"),
            None => list,
        };
        Turn::new(
            ConversationState::AwaitingServiceSelection { client, services },
            reply,
        )
    }

    fn to_main_menu(client: Client) -> Turn {
        let reply = messages::main_menu(&client.name);
        Turn::new(ConversationState::MainMenu { client }, reply)
    }

    async fn cancel(&self, appointment_id: i64) -> AppResult<()> {
        self.call(
            "cancel_appointment",
            self.bookings.cancel_appointment(appointment_id),
        )
        .await?;
        Ok(())
    }

    async fn slots_for(&self, date: NaiveDate) -> AppResult<Vec<Slot>> {
        self.call(
            "get_slots_for_date",
            self.availability
                .get_slots_for_date(self.settings.provider_id, date),
        )
        .await
    }

    fn existing_menu_reply(&self, client: &Client, appointment: &Appointment) -> String {
        let local = appointment.when_utc.with_timezone(&self.tz());
        messages::existing_appointment_menu(
            &client.name,
            appointment.service,
            local.date_naive(),
            local.time(),
        )
    }

    fn tz(&self) -> Tz {
        self.availability.timezone()
    }

    /// Run one external call under the per-call timeout
    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.settings.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.settings.call_timeout.as_millis() as u64,
                    "External call timed out"
                );
                Err(AppError::timeout(operation))
            }
        }
    }
}
