// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.
//!
//! Streaks are decided on UTC calendar-day boundaries. A user logging in at
//! 23:59 UTC and again at 00:01 UTC counts as two distinct days.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current UTC timestamp as RFC3339.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Today's UTC calendar date.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a calendar date as the "YYYY-MM-DD" key stored on stats records.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The calendar date one day before `date`.
pub fn day_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_key(date), "2024-03-07");
    }

    #[test]
    fn test_day_before_crosses_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(date_key(day_before(date)), "2024-02-29");
    }
}
