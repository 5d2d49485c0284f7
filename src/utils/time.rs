//! Time utilities: timestamps and HH:MM[:SS] parsing.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, SecondsFormat, Utc};

/// Current UTC instant as RFC 3339 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse `HH:MM:SS` or `HH:MM`.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

/// Validate an optional time and normalize it to `HH:MM:SS`.
pub fn normalize_optional_time(input: Option<&str>) -> AppResult<Option<String>> {
    match input {
        Some(s) => {
            let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
            Ok(Some(t.format("%H:%M:%S").to_string()))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_time_formats() {
        assert!(parse_time("08:30").is_some());
        assert!(parse_time("08:30:15").is_some());
        assert!(parse_time("25:00").is_none());
    }

    #[test]
    fn normalizes_to_seconds() {
        assert_eq!(
            normalize_optional_time(Some("9:05")).unwrap().as_deref(),
            Some("09:05:00")
        );
        assert!(normalize_optional_time(Some("noon")).is_err());
        assert!(normalize_optional_time(None).unwrap().is_none());
    }

    #[test]
    fn timestamp_is_utc_millis() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
