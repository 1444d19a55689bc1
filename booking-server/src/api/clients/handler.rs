//! Client API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::models::{Appointment, Client, ClientCreate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct ActiveAppointment {
    pub has_active: bool,
    pub appointment: Option<Appointment>,
}

/// GET /api/clients?phone= - 按手机号查找客户
pub async fn find_by_phone(
    State(state): State<ServerState>,
    Query(query): Query<PhoneQuery>,
) -> AppResult<Json<Client>> {
    let client = state
        .directory
        .find_client_by_phone(&query.phone)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::ClientNotFound, "Client not found")
                .with_detail("phone", query.phone.clone())
        })?;
    Ok(Json(client))
}

/// POST /api/clients - 注册客户
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state
        .directory
        .create_client(&payload.name, &payload.phone)
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/clients/:id/appointments - 未来的预约
pub async fn future_appointments(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Appointment>>> {
    // 404 for unknown clients rather than an empty list
    state.directory.get_client(id).await?;
    let appointments = state.bookings.get_future_appointments(id).await?;
    Ok(Json(appointments))
}

/// GET /api/clients/:id/active-appointment - 是否有未开始的预约
pub async fn active_appointment(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ActiveAppointment>> {
    state.directory.get_client(id).await?;
    let appointment = state.bookings.get_active_appointment(id).await?;
    Ok(Json(ActiveAppointment {
        has_active: appointment.is_some(),
        appointment,
    }))
}
