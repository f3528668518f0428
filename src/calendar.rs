//! Calendar window and staged-edit overlay
//!
//! Builds the contiguous week-aligned grid of days shown for a habit, and
//! manages the two-state edit session over it. In the viewing state only
//! today is interactively toggleable and a toggle mutates the authoritative
//! map immediately. An edit session stages toggles in a transient overlay
//! that never aliases the authoritative storage; committing replays each
//! staged entry through the single-day mutation entrypoint and discards the
//! overlay.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

use crate::dates::{day_key, monday_on_or_before, years_before};
use crate::types::{CalendarGrid, CalendarWeek, CompletionMap, MonthBreak};

/// Days of lookahead past today so near-future cells render (disabled)
pub const LOOKAHEAD_DAYS: i64 = 14;

/// Hard cap on the grid's lookback, in years. Older completions stay in
/// storage; they are just not shown in this grid.
pub const MAX_LOOKBACK_YEARS: i32 = 3;

/// Build the calendar grid for a completion map.
///
/// The range starts at the earlier of 1 year before today and the first
/// completion day, clamped to at most [`MAX_LOOKBACK_YEARS`] before today,
/// and extends [`LOOKAHEAD_DAYS`] past today. The grid is aligned to the
/// Monday on/before the range start and built of exact 7-day weeks, with a
/// month-label breakpoint wherever a week starts in a new month.
pub fn calendar_grid(map: &CompletionMap, today: NaiveDate) -> CalendarGrid {
    let year_back = years_before(today, 1);
    let raw_start = match map.first_day() {
        Some(first) if first < year_back => first,
        _ => year_back,
    };
    let start = raw_start.max(years_before(today, MAX_LOOKBACK_YEARS));
    let end = today + Duration::days(LOOKAHEAD_DAYS);

    let mut weeks = Vec::new();
    let mut month_breaks = Vec::new();
    let mut cursor = monday_on_or_before(start);
    let mut previous_month: Option<(i32, u32)> = None;

    while cursor <= end {
        let mut days = [cursor; 7];
        for (offset, slot) in days.iter_mut().enumerate() {
            *slot = cursor + Duration::days(offset as i64);
        }
        weeks.push(CalendarWeek { days });

        let month = month_of(cursor);
        if previous_month != Some(month) {
            month_breaks.push(MonthBreak {
                week_index: weeks.len() - 1,
                label: crate::dates::month_label(cursor).to_string(),
            });
            previous_month = Some(month);
        }

        cursor += Duration::days(7);
    }

    CalendarGrid {
        weeks,
        month_breaks,
    }
}

fn month_of(day: NaiveDate) -> (i32, u32) {
    use chrono::Datelike;
    (day.year(), day.month())
}

/// Editor state: viewing, or inside a staged-edit session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
}

/// Outcome of a toggle request against the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Applied directly to the authoritative map (viewing-state quick toggle)
    Committed,
    /// Recorded in the staged overlay
    Staged,
    /// Rejected: future day, or a non-today day outside an edit session
    Disabled,
}

/// Staged-edit session over one habit's completion map.
///
/// The overlay is disjoint from the authoritative map until committed and
/// is kept minimal: staging a day back to its authoritative value removes
/// the overlay entry. Exactly one edit session can be open at a time;
/// re-entering the editing state is a no-op.
#[derive(Debug, Default)]
pub struct CalendarEditor {
    overlay: BTreeMap<NaiveDate, bool>,
    editing: bool,
}

impl CalendarEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        if self.editing {
            EditMode::Editing
        } else {
            EditMode::Viewing
        }
    }

    /// Open an edit session with an empty overlay
    pub fn begin_edit(&mut self) {
        if !self.editing {
            self.editing = true;
            self.overlay.clear();
        }
    }

    /// Number of staged, uncommitted changes
    pub fn staged_count(&self) -> usize {
        self.overlay.len()
    }

    /// Effective done-state for rendering: overlay value if present, else
    /// the authoritative value
    pub fn effective(&self, map: &CompletionMap, day: NaiveDate) -> bool {
        self.overlay
            .get(&day)
            .copied()
            .unwrap_or_else(|| map.is_done(day))
    }

    /// Whether a day can be toggled in the current state
    pub fn is_toggleable(&self, day: NaiveDate, today: NaiveDate) -> bool {
        if day > today {
            // Future days are always disabled
            return false;
        }
        self.editing || day == today
    }

    /// Request a toggle of `day`.
    ///
    /// Viewing: only today is accepted, mutating the map immediately.
    /// Editing: any non-future day flips its effective value into the
    /// overlay; a flip back to the authoritative value drops the entry.
    pub fn toggle(
        &mut self,
        map: &mut CompletionMap,
        day: NaiveDate,
        today: NaiveDate,
    ) -> ToggleOutcome {
        if !self.is_toggleable(day, today) {
            return ToggleOutcome::Disabled;
        }

        if !self.editing {
            map.toggle(day);
            return ToggleOutcome::Committed;
        }

        let flipped = !self.effective(map, day);
        if flipped == map.is_done(day) {
            self.overlay.remove(&day);
        } else {
            self.overlay.insert(day, flipped);
        }
        ToggleOutcome::Staged
    }

    /// Replay every staged entry through the single-day mutation
    /// entrypoint, clear the overlay, and return to viewing.
    ///
    /// Each entry is an independent idempotent set, so replay order does
    /// not affect the result.
    pub fn commit(&mut self, map: &mut CompletionMap) {
        let staged = std::mem::take(&mut self.overlay);
        debug!(count = staged.len(), "committing staged calendar edits");
        for (day, done) in staged {
            debug!(day = %day_key(day), done, "replaying staged edit");
            map.set_done(day, done);
        }
        self.editing = false;
    }
}
