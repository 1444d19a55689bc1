//! Provider Model (服务提供者)

use serde::{Deserialize, Serialize};

/// The service professional whose calendar is booked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub name: String,
}
