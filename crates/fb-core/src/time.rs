//! Timestamp helpers.
//!
//! Timestamps are stored as RFC 3339 UTC text with second precision and a
//! `Z` suffix (`2025-12-15T00:00:00Z`), so string comparison in SQL matches
//! chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::{Error, Result};

/// Format a UTC instant in the canonical stored form.
pub fn format(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The current instant in the canonical stored form.
pub fn now() -> String {
    format(Utc::now())
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(Error::Validation(format!("invalid date '{value}'")))
}

/// Parse any accepted input and re-emit it in the canonical stored form.
pub fn normalize(value: &str) -> Result<String> {
    parse(value).map(format)
}

/// Milliseconds since the Unix epoch for a stored timestamp, if parseable.
pub fn epoch_millis(value: &str) -> Option<i64> {
    parse(value).ok().map(|dt| dt.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_date_is_midnight_utc() {
        assert_eq!(normalize("2025-12-15").unwrap(), "2025-12-15T00:00:00Z");
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        assert_eq!(
            normalize("2025-06-12T12:15:00+02:00").unwrap(),
            "2025-06-12T10:15:00Z"
        );
    }

    #[test]
    fn fractional_seconds_are_dropped() {
        assert_eq!(
            normalize("2025-06-12T10:15:00.123Z").unwrap(),
            "2025-06-12T10:15:00Z"
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse("next tuesday").unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn canonical_form_sorts_chronologically() {
        let a = normalize("2025-12-01").unwrap();
        let b = normalize("2025-12-15T08:00:00+00:00").unwrap();
        assert!(a < b);
    }

    #[test]
    fn epoch_millis_of_known_instant() {
        assert_eq!(epoch_millis("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(epoch_millis("nope"), None);
    }
}
