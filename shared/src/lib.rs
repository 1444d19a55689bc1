//! Shared types for the chat booking server
//!
//! Domain models, the unified error system and chat transport DTOs used by
//! the server and by any transport or dashboard talking to it.

pub mod chat;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use chat::{InboundMessage, ReplyMessage};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
