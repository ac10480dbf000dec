use chrono::DateTime;

/// Formats epoch milliseconds as `YYYY-MM-DD HH:MM UTC`; out-of-range values fall back to the raw number.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => timestamp_ms.to_string(),
    }
}
