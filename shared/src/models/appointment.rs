//! Appointment Model (预约)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::ServiceKind;

/// Appointment status
///
/// Cancellation is a status change; appointments are never hard-deleted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Pending or Confirmed - holds its slot
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Appointment record
///
/// Among non-cancelled appointments, (provider_id, when_utc) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub provider_id: i64,
    pub client_id: i64,
    /// ISO-8601 UTC instant
    pub when_utc: DateTime<Utc>,
    pub service: ServiceKind,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Holds its slot and has not started yet
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status.is_active() && self.when_utc >= now
    }
}

/// Create appointment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub provider_id: i64,
    pub client_id: i64,
    pub when_utc: DateTime<Utc>,
    pub service: ServiceKind,
}

/// Reschedule payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentReschedule {
    pub when_utc: DateTime<Utc>,
}
