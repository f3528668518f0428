//! Streak detection
//!
//! A streak is a maximal run of consecutive done days. The detector walks
//! the done days in ascending order and closes a run whenever the gap to the
//! next day exceeds one.

use crate::types::{CompletionMap, Streak};

/// Number of streaks reported by [`top_streaks`]
pub const TOP_STREAK_COUNT: usize = 5;

/// Every maximal streak in chronological order; empty input yields an
/// empty list.
pub fn all_streaks(map: &CompletionMap) -> Vec<Streak> {
    let mut streaks = Vec::new();
    let mut current: Option<Streak> = None;

    for day in map.done_days() {
        match current.as_mut() {
            Some(streak) if (day - streak.end).num_days() == 1 => {
                streak.end = day;
                streak.length += 1;
            }
            _ => {
                if let Some(done) = current.take() {
                    streaks.push(done);
                }
                current = Some(Streak {
                    start: day,
                    end: day,
                    length: 1,
                });
            }
        }
    }

    if let Some(done) = current {
        streaks.push(done);
    }

    streaks
}

/// The longest streaks, sorted by length descending and truncated to
/// [`TOP_STREAK_COUNT`]. Ties keep their chronological order.
pub fn top_streaks(map: &CompletionMap) -> Vec<Streak> {
    let mut streaks = all_streaks(map);
    streaks.sort_by(|a, b| b.length.cmp(&a.length));
    streaks.truncate(TOP_STREAK_COUNT);
    streaks
}
