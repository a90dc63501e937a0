//! Display helpers for the CLI.

use chrono::{DateTime, NaiveDateTime};

/// Render an ISO-8601 timestamp as `Jan 15, 2024, 10:30 AM`.
///
/// Timestamps with an offset are shown in that offset; naive timestamps are
/// shown as-is. Missing or unparsable input renders as `N/A`.
pub fn format_date(iso: Option<&str>) -> String {
    const PATTERN: &str = "%b %-d, %Y, %-I:%M %p";

    let Some(raw) = iso.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(PATTERN).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|parsed| parsed.format(PATTERN).to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Clip `text` to `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let clipped: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() {
        assert_eq!(
            format_date(Some("2024-01-15T10:30:00Z")),
            "Jan 15, 2024, 10:30 AM"
        );
        assert_eq!(
            format_date(Some("2024-03-02T17:05:09.123456+00:00")),
            "Mar 2, 2024, 5:05 PM"
        );
    }

    #[test]
    fn test_format_naive() {
        assert_eq!(
            format_date(Some("2023-12-31T00:15:00")),
            "Dec 31, 2023, 12:15 AM"
        );
    }

    #[test]
    fn test_missing_or_garbage_is_na() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("yesterday")), "N/A");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 8), "a longe…");
    }
}
