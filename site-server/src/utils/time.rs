//! Time helpers
//!
//! All persisted timestamps are Unix millis (`i64`), stamped by the
//! document store on write. Date/time form fields arrive as strings and
//! are parsed/validated at the handler or repository boundary.

use chrono::{NaiveDate, NaiveTime, Utc};

use super::{AppError, AppResult};

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Parse a 24h clock time string (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {}", time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date_and_time() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_time("19:00").is_ok());
    }

    #[test]
    fn rejects_malformed_date_and_time() {
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_time("7pm").is_err());
        assert!(parse_time("24:00").is_err());
    }
}
