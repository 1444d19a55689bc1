//! Chat transport DTOs
//!
//! The transport (WhatsApp bridge, test console, ...) posts one inbound
//! text per request and relays the reply verbatim.

use serde::{Deserialize, Serialize};

/// Inbound chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Sender phone number
    pub user_id: String,
    pub text: String,
}

/// Reply produced for one inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    pub reply: String,
}
