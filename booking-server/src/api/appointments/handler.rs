//! Appointment API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use shared::models::{Appointment, AppointmentCreate, AppointmentReschedule};

use crate::core::ServerState;
use crate::utils::AppResult;

/// POST /api/appointments - 创建预约 (409 表示时段已被占用)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = state
        .bookings
        .create_appointment(
            payload.provider_id,
            payload.client_id,
            payload.when_utc,
            payload.service,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments/:id - 获取单个预约
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.bookings.get_appointment(id).await?;
    Ok(Json(appointment))
}

/// DELETE /api/appointments/:id - 取消预约 (幂等)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.bookings.cancel_appointment(id).await?;
    Ok(Json(appointment))
}

/// POST /api/appointments/:id/confirm - 确认预约
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.bookings.confirm_appointment(id).await?;
    Ok(Json(appointment))
}

/// POST /api/appointments/:id/reschedule - 改期
pub async fn reschedule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AppointmentReschedule>,
) -> AppResult<Json<Appointment>> {
    let appointment = state
        .bookings
        .reschedule_appointment(id, payload.when_utc)
        .await?;
    Ok(Json(appointment))
}
