//! Wall-clock serde helpers
//!
//! 所有对外的时间都是 "HH:mm"，日期是 "YYYY-MM-DD"。

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

pub const HHMM: &str = "%H:%M";

/// Parse "HH:mm" (seconds tolerated as "HH:mm:ss")
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, HHMM)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Render as "HH:mm"
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(HHMM).to_string()
}

/// `NaiveTime` <-> "HH:mm"
pub mod hhmm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_hhmm(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time (HH:mm): {}", raw)))
    }
}

/// `Option<NaiveTime>` <-> "HH:mm" | null
pub mod hhmm_opt {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_some(&format_hhmm(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_hhmm(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid time (HH:mm): {}", raw))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_hhmm("18:30:00"), NaiveTime::from_hms_opt(18, 30, 0));
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm("nine"), None);
    }

    #[test]
    fn test_format_drops_seconds() {
        let t = NaiveTime::from_hms_opt(7, 5, 42).unwrap();
        assert_eq!(format_hhmm(t), "07:05");
    }
}
