//! Pipeline orchestration
//!
//! This module provides the public API for computing a habit's derived
//! statistics. Everything recomputes in full from the authoritative
//! completion map; [`StatsEngine`] adds memoization keyed on the map's
//! mutation version so repeated renders without data changes skip the
//! O(totalDays) walk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::calendar::calendar_grid;
use crate::frequency::weekday_frequency;
use crate::history::count_buckets;
use crate::score::{bucketed_scores, score_percent, score_series};
use crate::streaks::top_streaks;
use crate::types::{
    BucketPoint, CalendarGrid, CompletionMap, CountBucket, Granularity, MonthDistribution,
    ScorePoint, Streak,
};

/// Full derived-statistics bundle for one habit, consumed by rendering
/// collaborators as plain data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStats {
    /// Today's score as a rounded integer percentage
    pub score_percent: u32,
    /// Per-day score series from the first recorded day through today
    pub score_series: Vec<ScorePoint>,
    /// Top streaks, longest first
    pub streaks: Vec<Streak>,
    /// Weekly done-day counts over the lookback window
    pub weekly_history: Vec<CountBucket>,
    /// Month × weekday completion-count matrix
    pub frequency: Vec<MonthDistribution>,
    /// Week-aligned calendar window
    pub calendar: CalendarGrid,
}

/// Compute the full statistics bundle for a completion map.
///
/// # Arguments
/// * `map` - the authoritative completion record
/// * `today` - the observer's local calendar day
/// * `frequency` - expected completions per day (1.0 for a daily habit)
pub fn completion_stats(map: &CompletionMap, today: NaiveDate, frequency: f64) -> HabitStats {
    HabitStats {
        score_percent: score_percent(map, today, frequency),
        score_series: score_series(map, today, frequency),
        streaks: top_streaks(map),
        weekly_history: count_buckets(map, today, Granularity::Week),
        frequency: weekday_frequency(map, today),
        calendar: calendar_grid(map, today),
    }
}

/// Memoizing statistics engine for one habit.
///
/// Caches bucketed series keyed on the map's mutation version and the
/// query day; any change to either invalidates everything. Use this when
/// the same map is rendered repeatedly between mutations.
#[derive(Debug)]
pub struct StatsEngine {
    frequency: f64,
    cache_key: Option<(u64, NaiveDate)>,
    score_cache: HashMap<Granularity, Vec<BucketPoint>>,
    history_cache: HashMap<Granularity, Vec<CountBucket>>,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(crate::types::DAILY_FREQUENCY)
    }
}

impl StatsEngine {
    /// Create an engine for a habit of the given frequency
    pub fn new(frequency: f64) -> Self {
        Self {
            frequency,
            cache_key: None,
            score_cache: HashMap::new(),
            history_cache: HashMap::new(),
        }
    }

    /// Bucketed score view, memoized per granularity
    pub fn score_buckets(
        &mut self,
        map: &CompletionMap,
        today: NaiveDate,
        granularity: Granularity,
    ) -> Vec<BucketPoint> {
        self.refresh(map, today);
        let frequency = self.frequency;
        self.score_cache
            .entry(granularity)
            .or_insert_with(|| bucketed_scores(map, today, frequency, granularity))
            .clone()
    }

    /// Done-count history, memoized per granularity
    pub fn history_buckets(
        &mut self,
        map: &CompletionMap,
        today: NaiveDate,
        granularity: Granularity,
    ) -> Vec<CountBucket> {
        self.refresh(map, today);
        self.history_cache
            .entry(granularity)
            .or_insert_with(|| count_buckets(map, today, granularity))
            .clone()
    }

    /// Full uncached bundle (calendar, streaks and frequency grid are cheap
    /// relative to the series walks and are not memoized)
    pub fn stats(&self, map: &CompletionMap, today: NaiveDate) -> HabitStats {
        completion_stats(map, today, self.frequency)
    }

    fn refresh(&mut self, map: &CompletionMap, today: NaiveDate) {
        let key = (map.version(), today);
        if self.cache_key != Some(key) {
            debug!(version = key.0, "completion map changed; dropping cached series");
            self.score_cache.clear();
            self.history_cache.clear();
            self.cache_key = Some(key);
        }
    }
}
