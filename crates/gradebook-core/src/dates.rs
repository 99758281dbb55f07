//! # Date Utility
//!
//! Validates and formats calendar dates in the fixed `YYYY-MM-DD` format.
//!
//! Every mutating operation that accepts a date goes through [`parse`]
//! before anything is written, so the store only ever holds real calendar
//! dates. Comparisons (range filters) operate on parsed [`NaiveDate`]
//! values, never on raw strings.

use crate::primitives::DATE_FORMAT;
use crate::types::GradebookError;
use chrono::NaiveDate;

/// Today's date in the store's calendar.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a date in the fixed format, rejecting malformed or impossible
/// dates (e.g. `2024-02-30`) with a validation error.
pub fn parse(input: &str) -> Result<NaiveDate, GradebookError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| {
        GradebookError::Validation(format!("invalid date '{input}', expected YYYY-MM-DD"))
    })
}

/// Parse an optional date, falling back to today when absent.
pub fn parse_or_today(input: Option<&str>) -> Result<NaiveDate, GradebookError> {
    match input {
        Some(raw) => parse(raw),
        None => Ok(today()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_fixed_format() {
        let date = parse("2025-03-31").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 31).expect("ymd"));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["31/03/2025", "2025-3-1x", "yesterday", "", "2025-03-31T00:00:00"] {
            assert!(parse(bad).is_err(), "should reject {bad:?}");
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse("2024-02-30").is_err());
        assert!(parse("2025-13-01").is_err());
        // 2024 is a leap year, 2025 is not
        assert!(parse("2024-02-29").is_ok());
        assert!(parse("2025-02-29").is_err());
    }

    #[test]
    fn defaults_to_today_when_absent() {
        assert_eq!(parse_or_today(None).expect("today"), today());
        let explicit = parse_or_today(Some("2020-01-02")).expect("explicit");
        assert_eq!(explicit, NaiveDate::from_ymd_opt(2020, 1, 2).expect("ymd"));
    }
}
