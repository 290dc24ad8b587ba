use chrono::{TimeZone, Utc};

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60.0 * MS_PER_SECOND;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

/// Format a millisecond timestamp as UTC string, or return a placeholder on error.
pub fn format_timestamp(ts_millis: i64) -> String {
    match Utc.timestamp_millis_opt(ts_millis) {
        chrono::LocalResult::Single(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "invalid timestamp".to_string(),
    }
}

/// Format an optional millisecond timestamp, using '-' when missing.
pub fn format_timestamp_opt(ts: Option<i64>) -> String {
    ts.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

/// Render a duration in milliseconds compactly, e.g. `2m 30s`, `1d 4h 5s`, `350ms`.
///
/// Zero units are omitted. Below one second the value is shown in whole
/// milliseconds; otherwise seconds keep one floored decimal (`1m 1.5s`).
/// Returns `None` for NaN or infinite input.
pub fn humanize_duration_ms(ms: f64) -> Option<String> {
    if !ms.is_finite() {
        return None;
    }
    if ms < 0.0 {
        return humanize_duration_ms(-ms).map(|s| format!("-{}", s));
    }

    let days = (ms / MS_PER_DAY).trunc();
    let hours = (ms / MS_PER_HOUR).trunc() % 24.0;
    let minutes = (ms / MS_PER_MINUTE).trunc() % 60.0;

    let mut parts = Vec::new();
    push_unit(&mut parts, (days / 365.0).trunc(), "y");
    push_unit(&mut parts, days % 365.0, "d");
    push_unit(&mut parts, hours, "h");
    push_unit(&mut parts, minutes, "m");

    if ms < MS_PER_SECOND {
        let millis = ms.trunc() % 1000.0;
        let micros = (ms * 1e3).trunc() % 1000.0;
        let nanos = (ms * 1e6).trunc() % 1000.0;
        let below = millis + micros / 1e3 + nanos / 1e6;
        let rounded = if below >= 1.0 { below.round() } else { below.ceil() };
        push_unit(&mut parts, rounded, "ms");
    } else {
        let seconds = (ms / MS_PER_SECOND) % 60.0;
        // Epsilon: 60_300ms leaves 2.99999999999997 tenths, which must floor to 3
        let floored = ((seconds * 10.0) + 1e-7).floor() / 10.0;
        if floored != 0.0 {
            let text = format!("{:.1}", floored);
            let text = text.strip_suffix(".0").unwrap_or(&text);
            parts.push(format!("{}s", text));
        }
    }

    if parts.is_empty() {
        return Some("0ms".to_string());
    }
    Some(parts.join(" "))
}

fn push_unit(parts: &mut Vec<String>, value: f64, unit: &str) {
    if value != 0.0 {
        parts.push(format!("{}{}", value, unit));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp_opt(None), "-");
    }

    #[test]
    fn test_humanize_sub_second() {
        assert_eq!(humanize_duration_ms(0.0).as_deref(), Some("0ms"));
        assert_eq!(humanize_duration_ms(0.4).as_deref(), Some("1ms"));
        assert_eq!(humanize_duration_ms(500.0).as_deref(), Some("500ms"));
        assert_eq!(humanize_duration_ms(100.6).as_deref(), Some("101ms"));
    }

    #[test]
    fn test_humanize_compound() {
        assert_eq!(humanize_duration_ms(1_000.0).as_deref(), Some("1s"));
        assert_eq!(humanize_duration_ms(61_500.0).as_deref(), Some("1m 1.5s"));
        assert_eq!(humanize_duration_ms(150_000.0).as_deref(), Some("2m 30s"));
        assert_eq!(humanize_duration_ms(3_600_000.0).as_deref(), Some("1h"));
        assert_eq!(
            humanize_duration_ms(90_061_000.0).as_deref(),
            Some("1d 1h 1m 1s")
        );
        assert_eq!(
            humanize_duration_ms(400.0 * 86_400_000.0).as_deref(),
            Some("1y 35d")
        );
    }

    #[test]
    fn test_humanize_floors_seconds() {
        assert_eq!(humanize_duration_ms(59_999.0).as_deref(), Some("59.9s"));
        assert_eq!(humanize_duration_ms(1_250.5).as_deref(), Some("1.2s"));
        assert_eq!(humanize_duration_ms(60_300.0).as_deref(), Some("1m 0.3s"));
    }

    #[test]
    fn test_humanize_non_finite() {
        assert_eq!(humanize_duration_ms(f64::NAN), None);
        assert_eq!(humanize_duration_ms(f64::INFINITY), None);
        assert_eq!(humanize_duration_ms(-1_500.0).as_deref(), Some("-1.5s"));
    }
}
