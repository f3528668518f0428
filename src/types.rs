//! Core types for the Habitflux engine
//!
//! This module defines the data structures that flow through the engine:
//! the authoritative completion map, the habit descriptor, and the derived
//! series consumed by rendering collaborators as plain data.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::dates::{day_key, parse_day_key};

/// Expected completions per day for a daily habit
pub const DAILY_FREQUENCY: f64 = 1.0;

/// Completion marker for a single day.
///
/// The wire format carries either a boolean flag or a legacy numeric code:
/// `1` is a skip counted as done, `2` an explicit yes. Any other value,
/// including absence of the key, means not done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionMark {
    Flag(bool),
    Code(i64),
}

impl CompletionMark {
    /// Marker for an explicit completion
    pub fn yes() -> Self {
        CompletionMark::Flag(true)
    }

    /// Legacy marker for a skip counted as done
    pub fn skip() -> Self {
        CompletionMark::Code(1)
    }

    /// Whether this marker counts as done
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            CompletionMark::Flag(true) | CompletionMark::Code(1) | CompletionMark::Code(2)
        )
    }

    /// Whether this marker is the legacy skip code
    pub fn is_skip(&self) -> bool {
        matches!(self, CompletionMark::Code(1))
    }
}

/// Authoritative per-day completion record for one habit.
///
/// Only done entries are stored: a `false`/absent marker is semantically
/// identical to the key being absent, so not-done marks are dropped on
/// insert. Every mutation that changes the stored entries bumps `version`,
/// which downstream caches use as an explicit invalidation key.
///
/// Serializes as a `{"YYYY-MM-DD": marker}` object with original marker
/// codes preserved, so a skip survives a round trip as a skip.
#[derive(Debug, Clone, Default)]
pub struct CompletionMap {
    entries: BTreeMap<NaiveDate, CompletionMark>,
    version: u64,
}

/// Equality is over the stored entries; the version counter is a cache
/// key, not part of the record's identity.
impl PartialEq for CompletionMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for CompletionMap {}

impl CompletionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of done days
    pub fn done_count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the given day is marked done
    pub fn is_done(&self, day: NaiveDate) -> bool {
        self.entries.contains_key(&day)
    }

    /// The stored marker for a day, if any
    pub fn mark(&self, day: NaiveDate) -> Option<CompletionMark> {
        self.entries.get(&day).copied()
    }

    /// Earliest recorded day
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.entries.keys().next().copied()
    }

    /// Done days in ascending order
    pub fn done_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Stored (day, marker) entries in ascending day order
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, CompletionMark)> + '_ {
        self.entries.iter().map(|(d, m)| (*d, *m))
    }

    /// Monotonically increasing mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Set the done-state of a single day.
    ///
    /// This is the single mutation entrypoint: direct toggles and staged
    /// edit-overlay commits both funnel through here. Setting a day that is
    /// already in the requested state is a no-op and does not bump the
    /// version; setting an already-done day keeps its original marker.
    pub fn set_done(&mut self, day: NaiveDate, done: bool) {
        if done {
            if !self.entries.contains_key(&day) {
                self.entries.insert(day, CompletionMark::yes());
                self.version += 1;
            }
        } else if self.entries.remove(&day).is_some() {
            self.version += 1;
        }
    }

    /// Flip the done-state of a single day, returning the new state
    pub fn toggle(&mut self, day: NaiveDate) -> bool {
        let next = !self.is_done(day);
        self.set_done(day, next);
        next
    }

    /// Insert a raw marker as produced by an import adapter.
    ///
    /// Not-done markers are dropped, honoring the false-is-absent invariant.
    pub fn insert_mark(&mut self, day: NaiveDate, mark: CompletionMark) {
        if mark.is_done() {
            self.entries.insert(day, mark);
            self.version += 1;
        }
    }
}

impl FromIterator<(NaiveDate, CompletionMark)> for CompletionMap {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, CompletionMark)>>(iter: I) -> Self {
        let mut map = CompletionMap::new();
        for (day, mark) in iter {
            map.insert_mark(day, mark);
        }
        map
    }
}

impl Serialize for CompletionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.entries.len()))?;
        for (day, mark) in &self.entries {
            out.serialize_entry(&day_key(*day), mark)?;
        }
        out.end()
    }
}

impl<'de> Deserialize<'de> for CompletionMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, CompletionMark>::deserialize(deserializer)?;
        let mut map = CompletionMap::new();
        for (key, mark) in raw {
            let day = parse_day_key(&key).map_err(D::Error::custom)?;
            map.insert_mark(day, mark);
        }
        // A freshly loaded map starts at version 0 like a freshly built one
        map.version = 0;
        Ok(map)
    }
}

/// A tracked habit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique habit identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Expected completions per day; 1.0 means daily
    pub frequency: f64,
}

impl Habit {
    /// Create a daily habit with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frequency: DAILY_FREQUENCY,
        }
    }
}

/// Bucketing granularity for derived series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }

    /// First day of the bucket containing the given day.
    ///
    /// Week buckets are Monday-aligned; month, quarter and year buckets
    /// follow the calendar.
    pub fn bucket_start(&self, day: NaiveDate) -> NaiveDate {
        use chrono::Datelike;
        match self {
            Granularity::Day => day,
            Granularity::Week => crate::dates::monday_on_or_before(day),
            Granularity::Month => day.with_day(1).unwrap_or(day),
            Granularity::Quarter => crate::dates::quarter_start(day),
            Granularity::Year => NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
        }
    }

    /// First day of the bucket after the one starting at `start`
    pub fn advance(&self, start: NaiveDate) -> NaiveDate {
        use chrono::{Datelike, Duration, Months};
        match self {
            Granularity::Day => start + Duration::days(1),
            Granularity::Week => start + Duration::days(7),
            Granularity::Month => start + Months::new(1),
            Granularity::Quarter => start + Months::new(3),
            Granularity::Year => {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1).unwrap_or(start)
            }
        }
    }

    /// Presentational label for a bucket identified by its first day:
    /// "Jan 5" for days and weeks, "Jan 2024" for months and quarters,
    /// "2024" for years.
    pub fn bucket_label(&self, start: NaiveDate) -> String {
        use chrono::Datelike;
        match self {
            Granularity::Day | Granularity::Week => crate::dates::day_label(start),
            Granularity::Month | Granularity::Quarter => crate::dates::month_year_label(start),
            Granularity::Year => start.year().to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "quarter" => Ok(Granularity::Quarter),
            "year" => Ok(Granularity::Year),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

/// One day of the exponential-moving-average score series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub day: NaiveDate,
    /// Score in [0, 1]
    pub value: f64,
}

/// One labeled bucket of an averaged score series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketPoint {
    pub label: String,
    pub value: f64,
}

/// One labeled bucket of a done-day count series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBucket {
    pub label: String,
    pub count: u32,
}

/// A maximal run of consecutive done days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: u32,
}

/// Done-day counts for one month, indexed by raw weekday (0 = Sunday)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDistribution {
    pub label: String,
    pub weekday_counts: [u32; 7],
}

/// Seven consecutive days, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub days: [NaiveDate; 7],
}

impl CalendarWeek {
    /// The week's Monday
    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }
}

/// Month-label breakpoint within a calendar grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBreak {
    /// Index into the grid's week list
    pub week_index: usize,
    pub label: String,
}

/// Contiguous week-aligned grid of days plus month-label breakpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub weeks: Vec<CalendarWeek>,
    pub month_breaks: Vec<MonthBreak>,
}

impl CalendarGrid {
    /// First day shown in the grid
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.days[0])
    }

    /// Last day shown in the grid
    pub fn last_day(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|w| w.days[6])
    }
}
