//! Chat API 模块
//!
//! `POST /api/messages {user_id, text}` → `{reply}`

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/messages", post(handler::handle))
}
