//! Conversation Engine - per-user booking dialogue
//!
//! # 结构
//!
//! - [`engine`] - state dispatch, external calls, conflict recovery
//! - [`state`] - tagged conversation states and the session record
//! - [`session`] - session store seam and in-memory implementation
//! - [`input`] - reset/choice/text classification of free text
//! - [`messages`] - reply catalogue

pub mod engine;
pub mod input;
pub mod messages;
pub mod session;
pub mod state;

#[cfg(test)]
mod tests;

pub use engine::{ConversationEngine, EngineSettings};
pub use session::{InMemorySessionStore, SessionStore};
pub use state::{ConversationState, Session};
