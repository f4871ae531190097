//! Output formatters for Markdown and JSON.

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;

use chrono::{DateTime, NaiveDateTime};

/// Render an API timestamp as `YYYY-MM-DD HH:MM` UTC.
///
/// Timestamps that don't parse are returned unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format("%Y-%m-%d %H:%M").to_string();
    }
    // The backend sometimes omits the offset
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_or_else(|_| raw.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-01T12:30:00Z"), "2024-03-01 12:30");
        assert_eq!(format_date("2024-03-01T12:30:00+02:00"), "2024-03-01 10:30");
        assert_eq!(format_date("2024-03-01T12:30:00.123456"), "2024-03-01 12:30");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
