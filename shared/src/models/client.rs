//! Client Model (客户)

use serde::{Deserialize, Serialize};

/// A client, identified on the chat side by phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// Chat user id (phone number, digits only)
    pub phone: String,
}

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub phone: String,
}
