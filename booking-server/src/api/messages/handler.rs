//! Chat API Handlers

use axum::{Json, extract::State};
use shared::{InboundMessage, ReplyMessage};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// POST /api/messages - 处理一条聊天消息
pub async fn handle(
    State(state): State<ServerState>,
    Json(payload): Json<InboundMessage>,
) -> AppResult<Json<ReplyMessage>> {
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::validation("user_id must not be empty"));
    }
    let reply = state.conversation.handle_message(user_id, &payload.text).await;
    Ok(Json(ReplyMessage { reply }))
}
