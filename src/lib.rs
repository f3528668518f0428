//! Habitflux - On-device analytics engine for recurring-habit completion records
//!
//! Habitflux transforms a sparse per-day completion map into the derived
//! series a habit tracker renders: an exponential-moving-average score,
//! bucketed history counts, streaks, a weekday frequency grid, and a
//! week-aligned calendar window with a staged-edit overlay.
//!
//! ## Modules
//!
//! - **Score Engine**: per-day EMA score series and bucketed views
//! - **History / Streaks / Frequency**: done-day aggregation
//! - **Calendar**: grid construction and the preview/commit edit session
//! - **Adapters**: CSV/JSON import and export of completion maps

pub mod adapters;
pub mod calendar;
pub mod dates;
pub mod error;
pub mod frequency;
pub mod history;
pub mod pipeline;
pub mod score;
pub mod store;
pub mod streaks;
pub mod types;

pub use calendar::{CalendarEditor, EditMode, ToggleOutcome};
pub use error::EngineError;
pub use pipeline::{completion_stats, HabitStats, StatsEngine};
pub use store::HabitStore;
pub use types::{CompletionMap, CompletionMark, Granularity, Habit};

/// Engine version embedded in CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for CLI output
pub const PRODUCER_NAME: &str = "habitflux";
