//! Schedule Model (工作时间表)

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{format_hhmm, hhmm, hhmm_opt};
use crate::error::{AppError, AppResult, ErrorCode};

/// Weekday index, 0 = Sunday .. 6 = Saturday
pub type Weekday = u8;

/// Weekday index of a calendar date (0 = Sunday)
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday().num_days_from_sunday() as Weekday
}

/// One provider's declared working window for one weekday
///
/// At most one entry exists per (provider_id, weekday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub provider_id: i64,
    /// 0 (Sunday) .. 6 (Saturday)
    pub weekday: Weekday,
    pub active: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, with = "hhmm_opt")]
    pub break_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub break_end: Option<NaiveTime>,
}

impl ScheduleEntry {
    /// Half-open break window `[start, end)`, only when both ends are set
    pub fn break_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }

    /// Whether `time` falls inside the break
    pub fn is_on_break(&self, time: NaiveTime) -> bool {
        self.break_window()
            .is_some_and(|(start, end)| time >= start && time < end)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.weekday > 6 {
            return Err(AppError::with_message(
                ErrorCode::InvalidWeekday,
                format!("Weekday must be between 0 and 6, got {}", self.weekday),
            ));
        }
        if self.start_time >= self.end_time {
            return Err(AppError::with_message(
                ErrorCode::InvalidSchedule,
                format!(
                    "start_time {} must be before end_time {}",
                    format_hhmm(self.start_time),
                    format_hhmm(self.end_time)
                ),
            ));
        }
        match (self.break_start, self.break_end) {
            (None, None) => Ok(()),
            (Some(start), Some(end)) if start < end => Ok(()),
            (Some(start), Some(end)) => Err(AppError::with_message(
                ErrorCode::InvalidSchedule,
                format!(
                    "break_start {} must be before break_end {}",
                    format_hhmm(start),
                    format_hhmm(end)
                ),
            )),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidSchedule,
                "break_start and break_end must be set together",
            )),
        }
    }
}

/// Schedule upsert payload; the provider comes from the route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntryUpsert {
    pub weekday: Weekday,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, with = "hhmm_opt")]
    pub break_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub break_end: Option<NaiveTime>,
}

fn default_active() -> bool {
    true
}

impl ScheduleEntryUpsert {
    pub fn into_entry(self, provider_id: i64) -> ScheduleEntry {
        ScheduleEntry {
            provider_id,
            weekday: self.weekday,
            active: self.active,
            start_time: self.start_time,
            end_time: self.end_time,
            break_start: self.break_start,
            break_end: self.break_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry() -> ScheduleEntry {
        ScheduleEntry {
            provider_id: 1,
            weekday: 1,
            active: true,
            start_time: t(9, 0),
            end_time: t(18, 0),
            break_start: Some(t(12, 0)),
            break_end: Some(t(13, 0)),
        }
    }

    #[test]
    fn test_weekday_of_is_sunday_based() {
        // 2026-10-18 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(weekday_of(sunday), 0);
        assert_eq!(weekday_of(sunday.succ_opt().unwrap()), 1);
    }

    #[test]
    fn test_break_is_half_open() {
        let e = entry();
        assert!(!e.is_on_break(t(11, 59)));
        assert!(e.is_on_break(t(12, 0)));
        assert!(e.is_on_break(t(12, 59)));
        assert!(!e.is_on_break(t(13, 0)));
    }

    #[test]
    fn test_validate() {
        assert!(entry().validate().is_ok());

        let mut e = entry();
        e.weekday = 7;
        assert_eq!(e.validate().unwrap_err().code, ErrorCode::InvalidWeekday);

        let mut e = entry();
        e.end_time = t(9, 0);
        assert_eq!(e.validate().unwrap_err().code, ErrorCode::InvalidSchedule);

        let mut e = entry();
        e.break_end = None;
        assert_eq!(e.validate().unwrap_err().code, ErrorCode::InvalidSchedule);

        let mut e = entry();
        e.break_start = Some(t(14, 0));
        assert_eq!(e.validate().unwrap_err().code, ErrorCode::InvalidSchedule);
    }

    #[test]
    fn test_serde_wall_clock() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["break_end"], "13:00");

        let parsed: ScheduleEntry = serde_json::from_str(
            r#"{"provider_id":1,"weekday":2,"active":true,"start_time":"08:00","end_time":"12:00"}"#,
        )
        .unwrap();
        assert_eq!(parsed.break_window(), None);
        assert_eq!(parsed.start_time, t(8, 0));
    }

    #[test]
    fn test_upsert_payload_defaults_active() {
        let payload: ScheduleEntryUpsert = serde_json::from_str(
            r#"{"weekday":1,"start_time":"09:00","end_time":"18:00","break_start":"12:00","break_end":"13:00"}"#,
        )
        .unwrap();
        assert_eq!(payload.into_entry(1), entry());
    }
}
