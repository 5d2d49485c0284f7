use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn today_str() -> String {
    today().format("%Y-%m-%d").to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Validate an optional `YYYY-MM-DD` date.
pub fn validate_optional_date(input: Option<&str>) -> AppResult<Option<String>> {
    match input {
        Some(s) => {
            let d = parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))?;
            Ok(Some(d.format("%Y-%m-%d").to_string()))
        }
        None => Ok(None),
    }
}

/// Year and month of a `YYYY-MM-DD` string, when it parses.
pub fn year_month(s: &str) -> Option<(i32, u32)> {
    parse_date(s).map(|d| (d.year(), d.month()))
}
