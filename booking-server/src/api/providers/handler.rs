//! Provider API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{Appointment, ScheduleEntry, ScheduleEntryUpsert, Slot};

use crate::core::ServerState;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Longest accepted `days` query
const MAX_HORIZON_DAYS: u32 = 366;

#[derive(Debug, Deserialize)]
pub struct WorkingDaysQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    /// `YYYY-MM-DD`, business-local day
    pub date: Option<String>,
}

async fn require_provider(state: &ServerState, id: i64) -> AppResult<()> {
    if !state.directory.provider_exists(id).await? {
        return Err(AppError::with_message(
            ErrorCode::ProviderNotFound,
            format!("Provider {id} not found"),
        ));
    }
    Ok(())
}

/// GET /api/providers/:id/working-days - 可预约日期
pub async fn working_days(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<WorkingDaysQuery>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    require_provider(&state, id).await?;
    let days = query
        .days
        .unwrap_or(state.config.booking_horizon_days)
        .min(MAX_HORIZON_DAYS);
    let dates = state.availability.get_working_days(id, days).await?;
    Ok(Json(dates))
}

/// GET /api/providers/:id/slots/:date - 某日时段
pub async fn slots(
    State(state): State<ServerState>,
    Path((id, date)): Path<(i64, String)>,
) -> AppResult<Json<Vec<Slot>>> {
    require_provider(&state, id).await?;
    let date = parse_date(&date)?;
    let slots = state.availability.get_slots_for_date(id, date).await?;
    Ok(Json(slots))
}

/// GET /api/providers/:id/schedule - 每周时间表
pub async fn get_schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ScheduleEntry>>> {
    let entries = state.directory.get_schedule(id).await?;
    Ok(Json(entries))
}

/// PUT /api/providers/:id/schedule - 新增或替换某一天
pub async fn upsert_schedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ScheduleEntryUpsert>,
) -> AppResult<Json<ScheduleEntry>> {
    let entry = state
        .directory
        .upsert_schedule_entry(payload.into_entry(id))
        .await?;
    Ok(Json(entry))
}

/// POST /api/providers/:id/schedule - 批量新增或替换 (全部成功或全部失败)
pub async fn upsert_schedule_batch(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<Vec<ScheduleEntryUpsert>>,
) -> AppResult<Json<Vec<ScheduleEntry>>> {
    let entries = state.directory.upsert_schedule_entries(id, payload).await?;
    Ok(Json(entries))
}

/// GET /api/providers/:id/appointments - 预约列表 (含已取消)
pub async fn appointments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<AgendaQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let appointments = state.bookings.list_for_provider(id, date).await?;
    Ok(Json(appointments))
}
