//! Completion-count history
//!
//! Buckets actual done days (not scores) into dense series over a bounded
//! lookback window. Every period between the computed start and today emits
//! a bucket even when its count is zero, so charting axes stay contiguous.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::dates::{monday_on_or_before, years_before};
use crate::types::{CompletionMap, CountBucket, Granularity};

/// Count done days into dense buckets of the given granularity.
///
/// Lookback windows:
/// - day and week: the earlier of 1 year before today and the first
///   completion (weeks Monday-aligned)
/// - month and quarter: January of the first completion's year
/// - year: the first completion's year
///
/// With no completions recorded, each window falls back to ending at today
/// (day/week: one year back; month/quarter: January of the current year;
/// year: the current year) and every count is zero.
pub fn count_buckets(
    map: &CompletionMap,
    today: NaiveDate,
    granularity: Granularity,
) -> Vec<CountBucket> {
    let start = window_start(map, today, granularity);

    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for day in map.done_days() {
        if day >= start && day <= today {
            *counts.entry(granularity.bucket_start(day)).or_insert(0) += 1;
        }
    }

    let mut buckets = Vec::new();
    let mut cursor = start;
    while cursor <= today {
        buckets.push(CountBucket {
            label: granularity.bucket_label(cursor),
            count: counts.get(&cursor).copied().unwrap_or(0),
        });
        cursor = granularity.advance(cursor);
    }

    buckets
}

/// First bucket start of the lookback window
fn window_start(map: &CompletionMap, today: NaiveDate, granularity: Granularity) -> NaiveDate {
    let first = map.first_day();
    match granularity {
        Granularity::Day | Granularity::Week => {
            let year_back = years_before(today, 1);
            let raw = match first {
                Some(first) if first < year_back => first,
                _ => year_back,
            };
            if granularity == Granularity::Week {
                monday_on_or_before(raw)
            } else {
                raw
            }
        }
        Granularity::Month | Granularity::Quarter => {
            let year = first.map(|f| f.year()).unwrap_or_else(|| today.year());
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today)
        }
        Granularity::Year => {
            let year = first.map(|f| f.year()).unwrap_or_else(|| today.year());
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today)
        }
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
    fn test_weekly_counts_monday_aligned() {
        // 2024-01-07 is a Sunday, 2024-01-08 the following Monday
        let map = map_of(&[date(2024, 1, 7), date(2024, 1, 8)]);
        let buckets = count_buckets(&map, date(2024, 1, 10), Granularity::Week);

        // Lookback reaches a year before today; the last two buckets are
        // the weeks of Jan 1 and Jan 8
        let tail: Vec<u32> = buckets[buckets.len() - 2..].iter().map(|b| b.count).collect();
        assert_eq!(tail, vec![1, 1]);
        assert_eq!(buckets[buckets.len() - 2].label, "Jan 1");
        assert_eq!(buckets[buckets.len() - 1].label, "Jan 8");
    }

    #[test]
    fn test_weekly_series_is_dense() {
        let today = date(2024, 6, 15);
        let buckets = count_buckets(&CompletionMap::new(), today, Granularity::Week);

        let start = monday_on_or_before(years_before(today, 1));
        let expected = (today - start).num_days() / 7 + 1;
        assert_eq!(buckets.len() as i64, expected);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_weekly_lookback_extends_to_first_completion() {
        let first = date(2021, 3, 3);
        let map = map_of(&[first]);
        let buckets = count_buckets(&map, date(2024, 1, 10), Granularity::Week);

        // First bucket is the Monday on/before the first completion
        assert_eq!(buckets[0].label, "Mar 1");
        assert_eq!(buckets[0].count, 1);
    }

    #[test]
    fn test_monthly_counts_start_at_january_of_first_year() {
        let map = map_of(&[
            date(2024, 1, 5),
            date(2024, 1, 12),
            date(2024, 1, 30),
            date(2024, 3, 2),
        ]);
        let buckets = count_buckets(&map, date(2024, 4, 15), Granularity::Month);

        let counts: Vec<u32> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![3, 0, 1, 0]);
        assert_eq!(buckets[0].label, "Jan 2024");
        assert_eq!(buckets[3].label, "Apr 2024");
    }

    #[test]
    fn test_monthly_series_spans_first_year_through_current_month() {
        let map = map_of(&[date(2023, 6, 10)]);
        let buckets = count_buckets(&map, date(2024, 2, 5), Granularity::Month);
        // Jan 2023 .. Feb 2024
        assert_eq!(buckets.len(), 14);
        assert_eq!(buckets[0].label, "Jan 2023");
        assert_eq!(buckets[5].count, 1);
    }

    #[test]
    fn test_quarterly_labels_by_quarter_start_month() {
        let map = map_of(&[date(2024, 2, 10), date(2024, 4, 1)]);
        let buckets = count_buckets(&map, date(2024, 5, 1), Granularity::Quarter);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Jan 2024");
        assert_eq!(buckets[1].label, "Apr 2024");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_yearly_series_is_dense_across_empty_years() {
        let map = map_of(&[date(2022, 7, 1), date(2024, 1, 1)]);
        let buckets = count_buckets(&map, date(2024, 6, 1), Granularity::Year);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2022", "2023", "2024"]);
        let counts: Vec<u32> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1]);
    }

    #[test]
    fn test_empty_map_yields_all_zero_buckets() {
        let today = date(2024, 6, 15);
        for granularity in [
            Granularity::Day,
            Granularity::Week,
            Granularity::Month,
            Granularity::Quarter,
            Granularity::Year,
        ] {
            let buckets = count_buckets(&CompletionMap::new(), today, granularity);
            assert!(!buckets.is_empty());
            assert!(buckets.iter().all(|b| b.count == 0));
        }
    }

    #[test]
    fn test_daily_counts_are_indicator_values() {
        let map = map_of(&[date(2024, 6, 14)]);
        let buckets = count_buckets(&map, date(2024, 6, 15), Granularity::Day);

        let n = buckets.len();
        assert_eq!(buckets[n - 2].count, 1);
        assert_eq!(buckets[n - 1].count, 0);
    }
}
