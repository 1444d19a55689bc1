//! Provider API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/providers/{id}/working-days | GET | 可预约日期 (`?days=`) |
//! | /api/providers/{id}/slots/{date} | GET | 某日时段 |
//! | /api/providers/{id}/schedule | GET / PUT / POST | 每周时间表 (POST 批量) |
//! | /api/providers/{id}/appointments | GET | 预约列表 (`?date=`) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/providers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/working-days", get(handler::working_days))
        .route("/{id}/slots/{date}", get(handler::slots))
        .route(
            "/{id}/schedule",
            get(handler::get_schedule)
                .put(handler::upsert_schedule)
                .post(handler::upsert_schedule_batch),
        )
        .route("/{id}/appointments", get(handler::appointments))
}
