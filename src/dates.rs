//! Temporal utilities: ISO parsing, range spans, weekday numbering

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{AppError, AppResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn invalid_date() -> AppError {
    AppError::Validation("Invalid date format, use YYYY-MM-DD".to_string())
}

/// Parse an ISO calendar date or date-time. A bare date resolves to
/// midnight of that day.
pub fn parse_iso_datetime(value: &str) -> AppResult<NaiveDateTime> {
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| invalid_date())
}

/// Parse an ISO value and keep only the calendar date portion
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    parse_iso_datetime(value).map(|dt| dt.date())
}

/// Absolute distance between two parsed ISO values, in whole days
pub fn span_days(date_from: &str, date_to: &str) -> AppResult<i64> {
    let from = parse_iso_datetime(date_from)?;
    let to = parse_iso_datetime(date_to)?;
    Ok((to - from).num_days().abs())
}

/// ISO-style weekday number, Monday=1 .. Sunday=7
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_iso_datetime("2030-03-04").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2030, 3, 4).unwrap());
        assert_eq!(parsed.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_parse_datetime_variants() {
        assert!(parse_iso_datetime("2030-03-04T09:30:00").is_ok());
        assert!(parse_iso_datetime("2030-03-04 09:30:00").is_ok());
        assert!(parse_iso_datetime("2030-03-04T09:30").is_ok());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["04-03-2030", "2030/03/04", "2030-13-01", "not a date", ""] {
            let err = parse_iso_datetime(bad).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn test_span_days() {
        assert_eq!(span_days("2030-03-01", "2030-03-08").unwrap(), 7);
        assert_eq!(span_days("2030-03-08", "2030-03-01").unwrap(), 7);
        assert_eq!(span_days("2030-03-01", "2030-03-01").unwrap(), 0);
    }

    #[test]
    fn test_weekday_numbers() {
        // 2030-03-04 is a Monday
        let monday = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(weekday_number(monday), 1);
        assert_eq!(weekday_number(monday + chrono::Days::new(6)), 7);
    }
}
