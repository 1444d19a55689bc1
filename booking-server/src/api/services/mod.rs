//! Service Catalog API 模块

use axum::{Json, Router, extract::State, routing::get};
use http::StatusCode;
use shared::models::{ServiceCreate, ServiceOffering};

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/services", get(list).post(create))
}

/// GET /api/services - 获取所有服务项目
async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ServiceOffering>>> {
    let services = state.directory.list_services().await?;
    Ok(Json(services))
}

/// POST /api/services - 新增服务项目
async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServiceCreate>,
) -> AppResult<(StatusCode, Json<ServiceOffering>)> {
    let service = state.directory.create_service(payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}
