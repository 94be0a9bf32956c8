//! Date-tag arithmetic for the calendar endpoints.
//!
//! Entries carry two derived string keys: a day tag (`YYYY-MM-DD`) and a
//! month tag (`YYYYMM`, the day tag's first six characters with separators
//! stripped). Range queries work on these tags, not on stored dates.

use chrono::{Duration, NaiveDate};

use crate::models::ValidationError;

/// Derive the month tag from a day tag: strip `-`, keep the first six
/// characters.
pub fn month_tag(day: &str) -> String {
    day.chars().filter(|c| *c != '-').take(6).collect()
}

/// Parse and validate a day tag (`YYYY-MM-DD`).
pub fn parse_day(date: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: "date",
        reason: "expected YYYY-MM-DD",
    })
}

/// Three-month window around a month tag: the month itself plus its calendar
/// neighbors.
///
/// Derived from the first of the month: minus one day lands in the previous
/// month, plus 31 days always lands in the next (no month is longer).
pub fn month_window(month: &str) -> Result<[String; 3], ValidationError> {
    let first = NaiveDate::parse_from_str(&format!("{month}01"), "%Y%m%d").map_err(|_| {
        ValidationError::InvalidFormat { field: "month", reason: "expected YYYYMM" }
    })?;

    let before = first - Duration::days(1);
    let after = first + Duration::days(31);

    Ok([
        before.format("%Y%m").to_string(),
        month.to_string(),
        after.format("%Y%m").to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_tag_is_first_six_digits_of_day() {
        assert_eq!(month_tag("2022-05-01"), "202205");
        assert_eq!(month_tag("1999-12-31"), "199912");
    }

    #[test]
    fn parse_day_accepts_valid_dates() {
        assert!(parse_day("2022-05-01").is_ok());
        assert!(parse_day("2024-02-29").is_ok());
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(parse_day("2022-13-01").is_err());
        assert!(parse_day("2023-02-29").is_err());
        assert!(parse_day("20220501").is_err());
        assert!(parse_day("not-a-date").is_err());
    }

    #[test]
    fn window_spans_adjacent_months() {
        assert_eq!(
            month_window("202205").unwrap(),
            ["202204".to_string(), "202205".to_string(), "202206".to_string()]
        );
    }

    #[test]
    fn window_crosses_year_boundaries() {
        assert_eq!(
            month_window("202201").unwrap(),
            ["202112".to_string(), "202201".to_string(), "202202".to_string()]
        );
        assert_eq!(
            month_window("202212").unwrap(),
            ["202211".to_string(), "202212".to_string(), "202301".to_string()]
        );
    }

    #[test]
    fn window_handles_february() {
        // 28- and 29-day months still land in March with the +31 offset.
        assert_eq!(
            month_window("202302").unwrap(),
            ["202301".to_string(), "202302".to_string(), "202303".to_string()]
        );
        assert_eq!(
            month_window("202402").unwrap(),
            ["202401".to_string(), "202402".to_string(), "202403".to_string()]
        );
    }

    #[test]
    fn window_rejects_bad_month_tokens() {
        assert!(month_window("202213").is_err());
        assert!(month_window("2022").is_err());
        assert!(month_window("abcdef").is_err());
    }
}
