//! Calendar-day utilities
//!
//! Everything in the engine is keyed on the LOCAL calendar day, formatted as
//! a zero-padded `YYYY-MM-DD` string. Two instants that differ only in
//! time-of-day but share a local calendar day always produce the same key,
//! which also makes lexical ordering of keys date-safe.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Weekday};

use crate::error::EngineError;

/// Canonical day-key format
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// English month abbreviations, indexed by `month0`
const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a date as a canonical `YYYY-MM-DD` day key
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a canonical `YYYY-MM-DD` day key back into a date.
///
/// Only the canonical zero-padded form is accepted; chrono's numeric
/// parsing is lenient, so the key is checked against its re-rendering.
pub fn parse_day_key(key: &str) -> Result<NaiveDate, EngineError> {
    let date = NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|e| EngineError::DateParseError(format!("{}: {}", key, e)))?;
    if day_key(date) != key {
        return Err(EngineError::DateParseError(format!(
            "{}: not in canonical YYYY-MM-DD form",
            key
        )));
    }
    Ok(date)
}

/// Day key for an instant, taken in the observer's local calendar day
pub fn day_key_for(instant: &DateTime<Local>) -> String {
    day_key(instant.date_naive())
}

/// Today as a local calendar day
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// The `n` local calendar days ending today, oldest first, inclusive of today
pub fn past_days(n: usize, today: NaiveDate) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .map(|offset| today - Duration::days(offset as i64))
        .collect()
}

/// The Monday on or before the given date
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The same calendar date `n` years earlier; Feb 29 clamps to Feb 28
pub fn years_before(date: NaiveDate, n: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year() - n, date.month(), date.day()).unwrap_or_else(|| {
        // Only Feb 29 of a leap year can fail to map
        NaiveDate::from_ymd_opt(date.year() - n, 2, 28).unwrap_or(date)
    })
}

/// Quarter index of a date, 1-4
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// First day of the quarter containing the given date
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (quarter_of(date) - 1) * 3 + 1;
    // The 1st of a valid month always exists
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// Short English weekday name ("Mon" .. "Sun")
pub fn weekday_label(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Short English month name ("Jan" .. "Dec")
pub fn month_label(date: NaiveDate) -> &'static str {
    MONTH_ABBREV[date.month0() as usize]
}

/// Presentational day label, e.g. "Jan 5"
pub fn day_label(date: NaiveDate) -> String {
    format!("{} {}", month_label(date), date.day())
}

/// Presentational month label, e.g. "Jan 2024"
pub fn month_year_label(date: NaiveDate) -> String {
    format!("{} {}", month_label(date), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_key_zero_padded() {
        assert_eq!(day_key(date(2024, 1, 5)), "2024-01-05");
        assert_eq!(day_key(date(2024, 11, 30)), "2024-11-30");
    }

    #[test]
    fn test_day_key_round_trip() {
        let d = date(2024, 6, 15);
        assert_eq!(parse_day_key(&day_key(d)).unwrap(), d);
    }

    #[test]
    fn test_parse_day_key_rejects_malformed() {
        assert!(parse_day_key("2024/06/15").is_err());
        assert!(parse_day_key("not-a-date").is_err());
        assert!(parse_day_key("2024-13-01").is_err());
        // Non-canonical padding is rejected too
        assert!(parse_day_key("2024-1-1").is_err());
    }

    #[test]
    fn test_day_key_ignores_time_of_day() {
        let morning = Local.with_ymd_and_hms(2024, 6, 15, 0, 30, 0).unwrap();
        let night = Local.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap();
        assert_eq!(day_key_for(&morning), day_key_for(&night));
        assert_eq!(day_key_for(&morning), "2024-06-15");
    }

    #[test]
    fn test_past_days_oldest_first_inclusive() {
        let today = date(2024, 3, 10);
        let days = past_days(3, today);
        assert_eq!(days, vec![date(2024, 3, 8), date(2024, 3, 9), today]);
    }

    #[test]
    fn test_past_days_zero() {
        assert!(past_days(0, date(2024, 3, 10)).is_empty());
    }

    #[test]
    fn test_monday_alignment() {
        // 2024-06-15 is a Saturday; the preceding Monday is 2024-06-10
        assert_eq!(monday_on_or_before(date(2024, 6, 15)), date(2024, 6, 10));
        // A Monday maps to itself
        assert_eq!(monday_on_or_before(date(2024, 6, 10)), date(2024, 6, 10));
    }

    #[test]
    fn test_years_before() {
        assert_eq!(years_before(date(2024, 6, 15), 1), date(2023, 6, 15));
        assert_eq!(years_before(date(2024, 6, 15), 3), date(2021, 6, 15));
        // Leap day clamps
        assert_eq!(years_before(date(2024, 2, 29), 1), date(2023, 2, 28));
    }

    #[test]
    fn test_quarters() {
        assert_eq!(quarter_of(date(2024, 1, 31)), 1);
        assert_eq!(quarter_of(date(2024, 6, 1)), 2);
        assert_eq!(quarter_of(date(2024, 12, 31)), 4);
        assert_eq!(quarter_start(date(2024, 8, 20)), date(2024, 7, 1));
    }

    #[test]
    fn test_labels() {
        let d = date(2024, 1, 5);
        assert_eq!(weekday_label(d), "Fri");
        assert_eq!(month_label(d), "Jan");
        assert_eq!(day_label(d), "Jan 5");
        assert_eq!(month_year_label(d), "Jan 2024");
    }
}
