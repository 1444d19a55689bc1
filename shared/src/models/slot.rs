//! Slot Model (时段)
//!
//! Derived value, never persisted.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{format_hhmm, hhmm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Occupied,
}

/// One bookable unit of time on a given date, local to the provider timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: SlotStatus,
}

impl Slot {
    pub fn available(time: NaiveTime) -> Self {
        Self {
            time,
            status: SlotStatus::Available,
        }
    }

    pub fn occupied(time: NaiveTime) -> Self {
        Self {
            time,
            status: SlotStatus::Occupied,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }

    /// "HH:mm"
    pub fn label(&self) -> String {
        format_hhmm(self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_json_shape() {
        let slot = Slot::occupied(NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        let json = serde_json::to_string(&slot).unwrap();
        assert_eq!(json, r#"{"time":"10:00","status":"occupied"}"#);

        let back: Slot = serde_json::from_str(r#"{"time":"09:00","status":"available"}"#).unwrap();
        assert!(back.is_available());
        assert_eq!(back.label(), "09:00");
    }
}
