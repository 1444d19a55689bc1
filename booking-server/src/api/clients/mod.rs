//! Client API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/clients | GET / POST | 按手机号查找 (`?phone=`) / 注册 |
//! | /api/clients/{id}/appointments | GET | 未来的预约 |
//! | /api/clients/{id}/active-appointment | GET | 最近的有效预约 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clients", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::find_by_phone).post(handler::create))
        .route("/{id}/appointments", get(handler::future_appointments))
        .route("/{id}/active-appointment", get(handler::active_appointment))
}
