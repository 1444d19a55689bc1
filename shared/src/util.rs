use chrono::{DateTime, TimeZone, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis -> UTC instant (out-of-range values clamp to the epoch)
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_default()
}

/// Strip transport suffixes and non-digits from a chat user id
///
/// "5511999998888@c.us" -> "5511999998888"
pub fn normalize_phone(raw: &str) -> String {
    let base = raw.split('@').next().unwrap_or(raw);
    base.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_roundtrip() {
        let now = Utc::now();
        let back = millis_to_utc(now.timestamp_millis());
        assert_eq!(back.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("5511999998888@c.us"), "5511999998888");
        assert_eq!(normalize_phone("+55 (11) 99999-8888"), "5511999998888");
        assert_eq!(normalize_phone("5511@g.us"), "5511");
    }
}
