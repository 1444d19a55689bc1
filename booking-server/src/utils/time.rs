//! 时间工具函数: 业务时区转换
//!
//! Dates and wall-clock times cross the API as provider-local values; the
//! stores only see UTC instants. All conversions happen here.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};
use shared::models::serde_helpers::{format_hhmm, parse_hhmm};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:mm)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    parse_hhmm(time).ok_or_else(|| AppError::validation(format!("Invalid time format: {}", time)))
}

/// Longest wall-clock gap a timezone transition can open, in minutes
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// 日期 + 本地时间 → UTC (业务时区)
///
/// 歧义时间 (夏令时回拨) 取较早的时刻。本地时间不存在时 (夏令时跳跃)，
/// 取跳跃之后第一个有效时刻，例如 Santiago 的 00:00 → 01:00。
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(time);
    for minutes in 0..=MAX_GAP_MINUTES {
        let candidate = naive + Duration::minutes(minutes);
        if let Some(dt) = candidate.and_local_timezone(tz).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    tracing::warn!(%naive, %tz, "No valid local instant found, reading wall time as UTC");
    naive.and_utc()
}

/// 日期开始 (00:00) → UTC instant (业务时区)
pub fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    local_to_utc(date, NaiveTime::MIN, tz)
}

/// 日期结束 → 次日 00:00 的 UTC instant (业务时区)
///
/// 返回次日零点，调用方使用 `< end` (不含) 语义。
pub fn day_end_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let next_day = date.succ_opt().unwrap_or(date);
    local_to_utc(next_day, NaiveTime::MIN, tz)
}

/// UTC instant → "HH:mm" in the business timezone
pub fn local_hhmm(instant: DateTime<Utc>, tz: Tz) -> String {
    format_hhmm(instant.with_timezone(&tz).time())
}

/// 当前业务日期 (业务时区)
pub fn local_today(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// `days` consecutive dates starting at `from` (inclusive)
pub fn date_range(from: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..days as i64).filter_map(move |offset| from.checked_add_signed(Duration::days(offset)))
}

/// Parse an IANA timezone name, falling back to `fallback`
pub fn parse_timezone(name: &str, fallback: Tz) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|e| {
        tracing::warn!(
            "Failed to parse timezone '{}': {}, falling back to {}",
            name,
            e,
            fallback
        );
        fallback
    })
}
