//! Schedule Repository

use super::{RepoError, RepoResult};
use chrono::NaiveTime;
use shared::models::serde_helpers::{format_hhmm, parse_hhmm};
use shared::models::{ScheduleEntry, Weekday};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};

const COLUMNS: &str = "provider_id, weekday, is_active, start_time, end_time, break_start, break_end";

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    provider_id: i64,
    weekday: i64,
    is_active: bool,
    start_time: String,
    end_time: String,
    break_start: Option<String>,
    break_end: Option<String>,
}

fn time_column(value: &str) -> RepoResult<NaiveTime> {
    parse_hhmm(value).ok_or_else(|| RepoError::Database(format!("Invalid time column: {value}")))
}

impl TryFrom<ScheduleRow> for ScheduleEntry {
    type Error = RepoError;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        let weekday = Weekday::try_from(row.weekday)
            .map_err(|_| RepoError::Database(format!("Invalid weekday: {}", row.weekday)))?;
        Ok(Self {
            provider_id: row.provider_id,
            weekday,
            active: row.is_active,
            start_time: time_column(&row.start_time)?,
            end_time: time_column(&row.end_time)?,
            break_start: row.break_start.as_deref().map(time_column).transpose()?,
            break_end: row.break_end.as_deref().map(time_column).transpose()?,
        })
    }
}

/// All entries of a provider ordered by weekday
pub async fn find_by_provider(pool: &SqlitePool, provider_id: i64) -> RepoResult<Vec<ScheduleEntry>> {
    let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
        "SELECT {COLUMNS} FROM schedule_entry WHERE provider_id = ? ORDER BY weekday"
    ))
    .bind(provider_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ScheduleEntry::try_from).collect()
}

pub async fn find_by_weekday(
    pool: &SqlitePool,
    provider_id: i64,
    weekday: Weekday,
) -> RepoResult<Option<ScheduleEntry>> {
    let row = sqlx::query_as::<_, ScheduleRow>(&format!(
        "SELECT {COLUMNS} FROM schedule_entry WHERE provider_id = ? AND weekday = ?"
    ))
    .bind(provider_id)
    .bind(weekday as i64)
    .fetch_optional(pool)
    .await?;
    row.map(ScheduleEntry::try_from).transpose()
}

const UPSERT_SQL: &str = "INSERT INTO schedule_entry \
     (provider_id, weekday, is_active, start_time, end_time, break_start, break_end) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
     ON CONFLICT(provider_id, weekday) DO UPDATE SET \
     is_active = excluded.is_active, start_time = excluded.start_time, \
     end_time = excluded.end_time, break_start = excluded.break_start, \
     break_end = excluded.break_end";

fn upsert_query(entry: &ScheduleEntry) -> Query<'static, Sqlite, SqliteArguments<'static>> {
    sqlx::query(UPSERT_SQL)
        .bind(entry.provider_id)
        .bind(entry.weekday as i64)
        .bind(entry.active)
        .bind(format_hhmm(entry.start_time))
        .bind(format_hhmm(entry.end_time))
        .bind(entry.break_start.map(format_hhmm))
        .bind(entry.break_end.map(format_hhmm))
}

/// Insert or replace the entry for (provider, weekday)
pub async fn upsert(pool: &SqlitePool, entry: &ScheduleEntry) -> RepoResult<()> {
    upsert_query(entry).execute(pool).await?;
    Ok(())
}

/// Upsert a batch in one transaction
pub async fn upsert_many(pool: &SqlitePool, entries: &[ScheduleEntry]) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    for entry in entries {
        upsert_query(entry).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
