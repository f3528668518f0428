//! Month-by-weekday completion frequency grid
//!
//! For each calendar month in the lookback window, counts done days per
//! weekday. Counts are indexed by raw day-of-week (0 = Sunday .. 6 =
//! Saturday); a Monday-first presentation is the caller's rotation.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::dates::{month_year_label, years_before};
use crate::types::{CompletionMap, Granularity, MonthDistribution};

/// Build the month × weekday done-count matrix, one row per calendar month
/// from the earlier of the first completion's month and 1 year before
/// today, through the current month.
pub fn weekday_frequency(map: &CompletionMap, today: NaiveDate) -> Vec<MonthDistribution> {
    let start = window_start(map, today);

    let mut counts: BTreeMap<NaiveDate, [u32; 7]> = BTreeMap::new();
    for day in map.done_days() {
        if day >= start && day <= today {
            let month = Granularity::Month.bucket_start(day);
            let weekday = day.weekday().num_days_from_sunday() as usize;
            counts.entry(month).or_insert([0; 7])[weekday] += 1;
        }
    }

    let mut rows = Vec::new();
    let mut cursor = start;
    while cursor <= today {
        rows.push(MonthDistribution {
            label: month_year_label(cursor),
            weekday_counts: counts.get(&cursor).copied().unwrap_or([0; 7]),
        });
        cursor = Granularity::Month.advance(cursor);
    }

    rows
}

/// First month of the lookback window
fn window_start(map: &CompletionMap, today: NaiveDate) -> NaiveDate {
    let year_back = Granularity::Month.bucket_start(years_before(today, 1));
    match map.first_day() {
        Some(first) => {
            let first_month = Granularity::Month.bucket_start(first);
            first_month.min(year_back)
        }
        None => year_back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn map_of(days: &[NaiveDate]) -> CompletionMap {
        let mut map = CompletionMap::new();
        for day in days {
            map.set_done(*day, true);
        }
        map
    }

    #[test]
    fn test_counts_by_raw_weekday() {
        // 2024-06-02 is a Sunday, 2024-06-03 a Monday, 2024-06-10 a Monday
        let map = map_of(&[date(2024, 6, 2), date(2024, 6, 3), date(2024, 6, 10)]);
        let rows = weekday_frequency(&map, date(2024, 6, 15));

        let june = rows.last().unwrap();
        assert_eq!(june.label, "Jun 2024");
        assert_eq!(june.weekday_counts[0], 1); // Sunday
        assert_eq!(june.weekday_counts[1], 2); // Monday
        assert_eq!(june.weekday_counts[2], 0);
    }

    #[test]
    fn test_one_row_per_month_in_window() {
        let today = date(2024, 6, 15);
        let rows = weekday_frequency(&CompletionMap::new(), today);

        // Jun 2023 .. Jun 2024 inclusive
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0].label, "Jun 2023");
        assert_eq!(rows[12].label, "Jun 2024");
        assert!(rows.iter().all(|r| r.weekday_counts == [0; 7]));
    }

    #[test]
    fn test_window_extends_to_first_completion_month() {
        let map = map_of(&[date(2022, 11, 20)]);
        let rows = weekday_frequency(&map, date(2024, 1, 10));

        assert_eq!(rows[0].label, "Nov 2022");
        // 2022-11-20 is a Sunday
        assert_eq!(rows[0].weekday_counts[0], 1);
    }

    #[test]
    fn test_months_with_no_completions_stay_zeroed() {
        let map = map_of(&[date(2024, 1, 5)]);
        let rows = weekday_frequency(&map, date(2024, 3, 1));

        let feb = rows.iter().find(|r| r.label == "Feb 2024").unwrap();
        assert_eq!(feb.weekday_counts, [0; 7]);
    }
}
