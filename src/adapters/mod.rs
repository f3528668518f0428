//! Import/export format adapters
//!
//! Adapters turn external payloads into the uniform completion map the core
//! consumes, and render one back out. The core does not validate
//! provenance; adapters only enforce day-key syntax and marker semantics.
//! Malformed input here is the system's only user-visible failure source.

pub mod csv;
pub mod json;

pub use csv::CsvAdapter;
pub use json::JsonAdapter;

use crate::error::EngineError;
use crate::types::CompletionMap;

/// Trait for completion-map import adapters
pub trait CompletionImportAdapter {
    /// Parse a raw payload into a completion map
    fn parse(&self, raw: &str) -> Result<CompletionMap, EngineError>;
}
