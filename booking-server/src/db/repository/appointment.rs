//! Appointment Repository
//!
//! `when_utc` is stored as epoch millis. The partial unique index on
//! (provider_id, when_utc) for non-cancelled rows is what serializes
//! concurrent bookings of the same slot.

use super::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use shared::models::{Appointment, AppointmentCreate, AppointmentStatus, ServiceKind};
use shared::util::{millis_to_utc, now_millis};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, provider_id, client_id, when_utc, service, status";

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    provider_id: i64,
    client_id: i64,
    when_utc: i64,
    service: String,
    status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepoError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let service = ServiceKind::parse(&row.service)
            .ok_or_else(|| RepoError::Database(format!("Unknown service: {}", row.service)))?;
        let status = AppointmentStatus::parse(&row.status)
            .ok_or_else(|| RepoError::Database(format!("Unknown status: {}", row.status)))?;
        Ok(Self {
            id: row.id,
            provider_id: row.provider_id,
            client_id: row.client_id,
            when_utc: millis_to_utc(row.when_utc),
            service,
            status,
        })
    }
}

fn collect(rows: Vec<AppointmentRow>) -> RepoResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Appointment>> {
    let row = sqlx::query_as::<_, AppointmentRow>(&format!(
        "SELECT {COLUMNS} FROM appointment WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(Appointment::try_from).transpose()
}

/// Insert a PENDING appointment
///
/// Fails with `RepoError::Duplicate` when a non-cancelled appointment already
/// holds (provider_id, when_utc).
pub async fn create(pool: &SqlitePool, data: &AppointmentCreate) -> RepoResult<Appointment> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO appointment (provider_id, client_id, when_utc, service, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(data.provider_id)
    .bind(data.client_id)
    .bind(data.when_utc.timestamp_millis())
    .bind(data.service.as_str())
    .bind(AppointmentStatus::Pending.as_str())
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create appointment".into()))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: AppointmentStatus,
) -> RepoResult<Appointment> {
    let rows = sqlx::query("UPDATE appointment SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status.as_str())
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))
}

/// Move an appointment; the unique index rejects an occupied target slot
pub async fn update_when(
    pool: &SqlitePool,
    id: i64,
    when_utc: DateTime<Utc>,
) -> RepoResult<Appointment> {
    let rows = sqlx::query("UPDATE appointment SET when_utc = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(when_utc.timestamp_millis())
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Appointment {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Appointment {id} not found")))
}

/// Non-cancelled appointments of a provider in `[start, end)`
pub async fn find_active_in_range(
    pool: &SqlitePool,
    provider_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "SELECT {COLUMNS} FROM appointment \
         WHERE provider_id = ?1 AND when_utc >= ?2 AND when_utc < ?3 AND status <> 'CANCELLED' \
         ORDER BY when_utc"
    ))
    .bind(provider_id)
    .bind(start.timestamp_millis())
    .bind(end.timestamp_millis())
    .fetch_all(pool)
    .await?;
    collect(rows)
}

/// Every appointment of a provider, optionally within `[start, end)`
pub async fn find_by_provider(
    pool: &SqlitePool,
    provider_id: i64,
    range: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> RepoResult<Vec<Appointment>> {
    let rows = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointment \
                 WHERE provider_id = ?1 AND when_utc >= ?2 AND when_utc < ?3 \
                 ORDER BY when_utc, id"
            ))
            .bind(provider_id)
            .bind(start.timestamp_millis())
            .bind(end.timestamp_millis())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, AppointmentRow>(&format!(
                "SELECT {COLUMNS} FROM appointment WHERE provider_id = ? ORDER BY when_utc, id"
            ))
            .bind(provider_id)
            .fetch_all(pool)
            .await?
        }
    };
    collect(rows)
}

/// Non-cancelled appointments of a client at or after `from`, ascending
pub async fn find_active_for_client_from(
    pool: &SqlitePool,
    client_id: i64,
    from: DateTime<Utc>,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
        "SELECT {COLUMNS} FROM appointment \
         WHERE client_id = ?1 AND when_utc >= ?2 AND status <> 'CANCELLED' \
         ORDER BY when_utc"
    ))
    .bind(client_id)
    .bind(from.timestamp_millis())
    .fetch_all(pool)
    .await?;
    collect(rows)
}
