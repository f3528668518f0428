//! Habit score computation
//!
//! The score is a fixed-decay exponential moving average over the completion
//! record: each day's score is the previous day's score decayed by a
//! frequency-derived multiplier, pulled toward 1 on done days and toward 0
//! otherwise. The recurrence is sequential and order-dependent, so the
//! series walks EVERY calendar day from the earliest recorded day through
//! today; skipping days would corrupt it.

use chrono::{Duration, NaiveDate};

use crate::types::{BucketPoint, CompletionMap, Granularity, ScorePoint};

/// Days for a daily habit's score influence to halve
pub const SCORE_HALF_LIFE_DAYS: f64 = 13.0;

/// Per-day decay multiplier for a habit of the given frequency.
///
/// For a daily habit (frequency 1.0) this is `0.5^(1/13)` ≈ 0.9486.
pub fn multiplier(frequency: f64) -> f64 {
    0.5_f64.powf(frequency.sqrt() / SCORE_HALF_LIFE_DAYS)
}

/// Compute the per-day score series from the earliest recorded day through
/// today, inclusive. An empty map yields an empty series.
pub fn score_series(map: &CompletionMap, today: NaiveDate, frequency: f64) -> Vec<ScorePoint> {
    let first = match map.first_day() {
        Some(first) if first <= today => first,
        _ => return Vec::new(),
    };

    let m = multiplier(frequency);
    let days = (today - first).num_days() + 1;
    let mut series = Vec::with_capacity(days as usize);
    let mut score = 0.0;

    let mut day = first;
    while day <= today {
        let checkmark = if map.is_done(day) { 1.0 } else { 0.0 };
        score = score * m + checkmark * (1.0 - m);
        series.push(ScorePoint { day, value: score });
        day += Duration::days(1);
    }

    series
}

/// Today's score in [0, 1]; 0 for an empty map
pub fn score_today(map: &CompletionMap, today: NaiveDate, frequency: f64) -> f64 {
    score_series(map, today, frequency)
        .last()
        .map(|point| point.value)
        .unwrap_or(0.0)
}

/// Today's score as a rounded integer percentage
pub fn score_percent(map: &CompletionMap, today: NaiveDate, frequency: f64) -> u32 {
    (score_today(map, today, frequency) * 100.0).round() as u32
}

/// Compute the score series and group it into labeled buckets
pub fn bucketed_scores(
    map: &CompletionMap,
    today: NaiveDate,
    frequency: f64,
    granularity: Granularity,
) -> Vec<BucketPoint> {
    bucket_day_scores(&score_series(map, today, frequency), granularity)
}

/// Group an already-computed day series into labeled buckets.
///
/// Day granularity passes the series through; the others report the
/// arithmetic mean of the per-day scores falling in each bucket. A bucket
/// with no contributing days reports 0.
pub fn bucket_day_scores(series: &[ScorePoint], granularity: Granularity) -> Vec<BucketPoint> {
    let mut buckets: Vec<(NaiveDate, f64, u32)> = Vec::new();

    for point in series {
        let start = granularity.bucket_start(point.day);
        match buckets.last_mut() {
            Some((current, sum, n)) if *current == start => {
                *sum += point.value;
                *n += 1;
            }
            // The series is day-ordered, so bucket starts arrive in order
            _ => buckets.push((start, point.value, 1)),
        }
    }

    buckets
        .into_iter()
        .map(|(start, sum, n)| BucketPoint {
            label: granularity.bucket_label(start),
            value: if n == 0 { 0.0 } else { sum / n as f64 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompletionMark, DAILY_FREQUENCY};

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
    fn test_multiplier_for_daily_habit() {
        let m = multiplier(DAILY_FREQUENCY);
        assert!((m - 0.5_f64.powf(1.0 / 13.0)).abs() < 1e-12);
        assert!((m - 0.9486).abs() < 0.0001);
    }

    #[test]
    fn test_first_day_score_identity() {
        // Single completion queried on its own day: S = 0 * m + 1 * (1 - m)
        let day = date(2024, 1, 1);
        let map = map_of(&[day]);
        let series = score_series(&map, day, DAILY_FREQUENCY);

        assert_eq!(series.len(), 1);
        let expected = 1.0 - multiplier(DAILY_FREQUENCY);
        assert!((series[0].value - expected).abs() < 1e-12);
        assert_eq!(score_percent(&map, day, DAILY_FREQUENCY), 5);
    }

    #[test]
    fn test_series_walks_every_day() {
        let map = map_of(&[date(2024, 1, 1), date(2024, 1, 10)]);
        let series = score_series(&map, date(2024, 1, 15), DAILY_FREQUENCY);

        assert_eq!(series.len(), 15);
        for (i, point) in series.iter().enumerate() {
            assert_eq!(point.day, date(2024, 1, 1) + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_score_bounded_in_unit_interval() {
        // Alternating done/missed days over several months
        let days: Vec<NaiveDate> = (0..200)
            .filter(|i| i % 2 == 0)
            .map(|i| date(2024, 1, 1) + Duration::days(i))
            .collect();
        let map = map_of(&days);
        let series = score_series(&map, date(2024, 12, 31), DAILY_FREQUENCY);

        for point in &series {
            assert!(point.value >= 0.0 && point.value <= 1.0);
        }
    }

    #[test]
    fn test_score_rises_on_done_and_decays_on_missed() {
        let days: Vec<NaiveDate> = (0..5).map(|i| date(2024, 1, 1) + Duration::days(i)).collect();
        let map = map_of(&days);
        let series = score_series(&map, date(2024, 1, 10), DAILY_FREQUENCY);

        // Rising while the habit is kept
        for pair in series[..5].windows(2) {
            assert!(pair[1].value > pair[0].value);
        }
        // Decaying once it stops
        for pair in series[5..].windows(2) {
            assert!(pair[1].value < pair[0].value);
        }
    }

    #[test]
    fn test_legacy_codes_count_as_done() {
        let day = date(2024, 1, 1);
        let mut map = CompletionMap::new();
        map.insert_mark(day, CompletionMark::skip());

        let with_skip = score_today(&map, day, DAILY_FREQUENCY);
        let with_yes = score_today(&map_of(&[day]), day, DAILY_FREQUENCY);
        assert_eq!(with_skip, with_yes);
    }

    #[test]
    fn test_empty_map_scores_zero() {
        let map = CompletionMap::new();
        assert!(score_series(&map, date(2024, 6, 15), DAILY_FREQUENCY).is_empty());
        assert_eq!(score_today(&map, date(2024, 6, 15), DAILY_FREQUENCY), 0.0);
        assert_eq!(score_percent(&map, date(2024, 6, 15), DAILY_FREQUENCY), 0);
    }

    #[test]
    fn test_day_buckets_pass_through() {
        let map = map_of(&[date(2024, 1, 1)]);
        let series = score_series(&map, date(2024, 1, 3), DAILY_FREQUENCY);
        let buckets = bucket_day_scores(&series, Granularity::Day);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, "Jan 1");
        assert!((buckets[0].value - series[0].value).abs() < 1e-12);
    }

    #[test]
    fn test_week_buckets_are_monday_aligned_means() {
        // 2024-01-01 is a Monday; today is the following Monday
        let map = map_of(&[date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        let series = score_series(&map, date(2024, 1, 8), DAILY_FREQUENCY);
        let buckets = bucket_day_scores(&series, Granularity::Week);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "Jan 1");
        assert_eq!(buckets[1].label, "Jan 8");

        let first_week_mean: f64 =
            series[..7].iter().map(|p| p.value).sum::<f64>() / 7.0;
        assert!((buckets[0].value - first_week_mean).abs() < 1e-12);
        assert!((buckets[1].value - series[7].value).abs() < 1e-12);
    }

    #[test]
    fn test_month_and_year_buckets() {
        let map = map_of(&[date(2023, 12, 30)]);
        let series = score_series(&map, date(2024, 1, 5), DAILY_FREQUENCY);

        let months = bucket_day_scores(&series, Granularity::Month);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label, "Dec 2023");
        assert_eq!(months[1].label, "Jan 2024");

        let years = bucket_day_scores(&series, Granularity::Year);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].label, "2023");
        assert_eq!(years[1].label, "2024");
        // The current year bucket only averages days up to today
        let jan_mean: f64 = series[2..].iter().map(|p| p.value).sum::<f64>() / 5.0;
        assert!((years[1].value - jan_mean).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_buckets() {
        let map = map_of(&[date(2024, 3, 30)]);
        let series = score_series(&map, date(2024, 4, 2), DAILY_FREQUENCY);
        let quarters = bucket_day_scores(&series, Granularity::Quarter);

        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[0].label, "Jan 2024");
        assert_eq!(quarters[1].label, "Apr 2024");
    }
}
