use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

/// Timestamp formats seen across ticket exports and the offline report:
/// day-month-year and year-month-day, with and without time-of-day.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y"];

/// Parse a timestamp in any of the known formats. Date-only values map to
/// midnight. Blank input is None silently; non-blank unparseable input is
/// None with a warn log, never an error.
pub fn parse_flexible_datetime(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    warn!("unparseable timestamp: {trimmed:?}");
    None
}

/// "" → None, "value" → Some("value") with surrounding whitespace removed.
pub fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_first_with_seconds() {
        let dt = parse_flexible_datetime("2025-09-13 21:21:46").unwrap();
        assert_eq!(dt.format("%Y-%m-%dT%H:%M:%S").to_string(), "2025-09-13T21:21:46");
    }

    #[test]
    fn test_year_first_without_seconds() {
        assert!(parse_flexible_datetime("2025-09-13 21:21").is_some());
    }

    #[test]
    fn test_day_first() {
        let dt = parse_flexible_datetime("13-09-2025 21:21").unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2025-09-13");
    }

    #[test]
    fn test_date_only_maps_to_midnight() {
        let dt = parse_flexible_datetime("2025-09-13").unwrap();
        assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(parse_flexible_datetime("13-09-2025").is_some());
    }

    #[test]
    fn test_blank_and_garbage() {
        assert!(parse_flexible_datetime("").is_none());
        assert!(parse_flexible_datetime("   ").is_none());
        assert!(parse_flexible_datetime("not-a-date").is_none());
        assert!(parse_flexible_datetime("2025-99-99 00:00:00").is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" x "), Some("x".to_string()));
    }
}
