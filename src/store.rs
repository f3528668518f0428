//! Habit store
//!
//! The serializable `{habits, completions}` structure exchanged with the
//! persistence collaborator, plus the application-level mutation entrypoint.
//! The store owns the authoritative completion maps; aggregators receive
//! read-only views of a single habit's map.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::dates::day_key;
use crate::error::EngineError;
use crate::types::{CompletionMap, Habit};

/// Top-level application state: tracked habits and their completion maps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitStore {
    pub habits: Vec<Habit>,
    pub completions: HashMap<Uuid, CompletionMap>,
}

impl HabitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a habit with an empty completion map, returning its id
    pub fn add_habit(&mut self, habit: Habit) -> Uuid {
        let id = habit.id;
        self.completions.entry(id).or_default();
        self.habits.push(habit);
        id
    }

    /// Look up a habit by id
    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Look up a habit by display name (first match)
    pub fn habit_by_name(&self, name: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.name == name)
    }

    /// Read-only view of a habit's completion map
    pub fn completions(&self, id: Uuid) -> Result<&CompletionMap, EngineError> {
        self.completions.get(&id).ok_or(EngineError::UnknownHabit(id))
    }

    /// Set the done-state of one day for one habit.
    ///
    /// This is the single mutation entrypoint exposed to the application;
    /// direct toggles and overlay-commit replays both arrive here.
    pub fn set_completion(
        &mut self,
        id: Uuid,
        day: NaiveDate,
        done: bool,
    ) -> Result<(), EngineError> {
        let map = self
            .completions
            .get_mut(&id)
            .ok_or(EngineError::UnknownHabit(id))?;
        debug!(habit = %id, day = %day_key(day), done, "set completion");
        map.set_done(day, done);
        Ok(())
    }

    /// Flip the done-state of one day for one habit, returning the new state
    pub fn toggle_completion(&mut self, id: Uuid, day: NaiveDate) -> Result<bool, EngineError> {
        let map = self
            .completions
            .get_mut(&id)
            .ok_or(EngineError::UnknownHabit(id))?;
        let state = map.toggle(day);
        debug!(habit = %id, day = %day_key(day), done = state, "toggled completion");
        Ok(state)
    }

    /// Replace a habit's completion map wholesale (import adapters land here)
    pub fn replace_completions(&mut self, id: Uuid, map: CompletionMap) -> Result<(), EngineError> {
        if self.habit(id).is_none() {
            return Err(EngineError::UnknownHabit(id));
        }
        self.completions.insert(id, map);
        Ok(())
    }

    /// Load a store from JSON
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the store to JSON
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
