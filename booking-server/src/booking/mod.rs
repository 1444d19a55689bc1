//! Booking Service
//!
//! Creates and mutates appointments. The no-double-booking rule is enforced
//! by the store in the same write as the insert/move; a losing write comes
//! back as `RepoError::Duplicate` and is surfaced as
//! [`ErrorCode::SlotUnavailable`] (see [`AppError::is_conflict`]).

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use shared::models::{Appointment, AppointmentCreate, AppointmentStatus, ServiceKind};
use std::sync::Arc;

use crate::clock::Clock;
use crate::store::{BookingStore, DirectoryStore, RepoError};
use crate::utils::time::{day_end_utc, day_start_utc};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    directory: Arc<dyn DirectoryStore>,
    clock: Arc<dyn Clock>,
    /// Business timezone, used to turn agenda dates into UTC bounds
    tz: Tz,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn DirectoryStore>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            bookings,
            directory,
            clock,
            tz,
        }
    }

    /// Book a slot as PENDING
    ///
    /// Errors: `ProviderNotFound` / `ClientNotFound`, `AppointmentInPast`,
    /// `SlotUnavailable` when a non-cancelled appointment holds the slot.
    pub async fn create_appointment(
        &self,
        provider_id: i64,
        client_id: i64,
        when_utc: DateTime<Utc>,
        service: ServiceKind,
    ) -> AppResult<Appointment> {
        if !self.directory.provider_exists(provider_id).await? {
            return Err(provider_not_found(provider_id));
        }
        if !self.directory.client_exists(client_id).await? {
            return Err(client_not_found(client_id));
        }
        self.ensure_future(when_utc)?;

        let data = AppointmentCreate {
            provider_id,
            client_id,
            when_utc,
            service,
        };
        match self.bookings.insert(data).await {
            Ok(appointment) => {
                tracing::info!(
                    appointment_id = appointment.id,
                    provider_id,
                    client_id,
                    when_utc = %when_utc,
                    service = service.as_str(),
                    "Appointment created"
                );
                Ok(appointment)
            }
            Err(RepoError::Duplicate(msg)) => {
                tracing::warn!(provider_id, client_id, when_utc = %when_utc, "Slot already taken");
                Err(AppError::slot_taken(msg))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Mark as CANCELLED; cancelling twice is a no-op
    pub async fn cancel_appointment(&self, id: i64) -> AppResult<Appointment> {
        let appointment = self.get_appointment(id).await?;
        if appointment.status == AppointmentStatus::Cancelled {
            tracing::debug!(appointment_id = id, "Appointment already cancelled");
            return Ok(appointment);
        }
        let cancelled = self
            .bookings
            .set_status(id, AppointmentStatus::Cancelled)
            .await?;
        tracing::info!(appointment_id = id, "Appointment cancelled");
        Ok(cancelled)
    }

    /// PENDING → CONFIRMED
    pub async fn confirm_appointment(&self, id: i64) -> AppResult<Appointment> {
        let appointment = self.get_appointment(id).await?;
        match appointment.status {
            AppointmentStatus::Confirmed => Ok(appointment),
            AppointmentStatus::Cancelled => Err(cancelled_error(id)),
            AppointmentStatus::Pending => {
                let confirmed = self
                    .bookings
                    .set_status(id, AppointmentStatus::Confirmed)
                    .await?;
                tracing::info!(appointment_id = id, "Appointment confirmed");
                Ok(confirmed)
            }
        }
    }

    /// Move an active appointment to another instant
    ///
    /// Same uniqueness rule as creation: an occupied target is `SlotUnavailable`.
    pub async fn reschedule_appointment(
        &self,
        id: i64,
        when_utc: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let appointment = self.get_appointment(id).await?;
        if appointment.status == AppointmentStatus::Cancelled {
            return Err(cancelled_error(id));
        }
        self.ensure_future(when_utc)?;
        if appointment.when_utc == when_utc {
            return Ok(appointment);
        }

        match self.bookings.move_to(id, when_utc).await {
            Ok(moved) => {
                tracing::info!(appointment_id = id, when_utc = %when_utc, "Appointment rescheduled");
                Ok(moved)
            }
            Err(RepoError::Duplicate(msg)) => {
                tracing::warn!(appointment_id = id, when_utc = %when_utc, "Reschedule target taken");
                Err(AppError::slot_taken(msg))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_appointment(&self, id: i64) -> AppResult<Appointment> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AppointmentNotFound,
                    format!("Appointment {id} not found"),
                )
            })
    }

    /// PENDING/CONFIRMED appointments not yet started, earliest first
    pub async fn get_future_appointments(&self, client_id: i64) -> AppResult<Vec<Appointment>> {
        let now = self.clock.now();
        let mut appointments = self.bookings.active_for_client_from(client_id, now).await?;
        appointments.retain(|a| a.is_upcoming(now));
        appointments.sort_by_key(|a| a.when_utc);
        Ok(appointments)
    }

    /// Provider agenda in any status, ordered by time
    ///
    /// With a date only the appointments of that local business day are listed.
    pub async fn list_for_provider(
        &self,
        provider_id: i64,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Appointment>> {
        if !self.directory.provider_exists(provider_id).await? {
            return Err(provider_not_found(provider_id));
        }
        let range = date.map(|d| (day_start_utc(d, self.tz), day_end_utc(d, self.tz)));
        Ok(self.bookings.list_for_provider(provider_id, range).await?)
    }

    /// Earliest future appointment, if any
    pub async fn get_active_appointment(&self, client_id: i64) -> AppResult<Option<Appointment>> {
        Ok(self
            .get_future_appointments(client_id)
            .await?
            .into_iter()
            .next())
    }

    fn ensure_future(&self, when_utc: DateTime<Utc>) -> AppResult<()> {
        if when_utc < self.clock.now() {
            return Err(AppError::with_message(
                ErrorCode::AppointmentInPast,
                format!("Cannot book {when_utc}: instant is in the past"),
            ));
        }
        Ok(())
    }
}

fn provider_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ProviderNotFound, format!("Provider {id} not found"))
}

fn client_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::ClientNotFound, format!("Client {id} not found"))
}

fn cancelled_error(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::AppointmentCancelled,
        format!("Appointment {id} is cancelled"),
    )
}
