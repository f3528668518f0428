//! JSON completion-map adapter
//!
//! The wire format is a single object mapping day keys to markers:
//! `{"2024-01-01": true, "2024-01-02": 2, "2024-01-03": 1}`. Boolean flags
//! and the legacy numeric codes are both accepted; not-done entries are
//! dropped on ingest.

use super::CompletionImportAdapter;
use crate::error::EngineError;
use crate::types::CompletionMap;

/// Adapter for the `{day-key: marker}` JSON object format
pub struct JsonAdapter;

impl CompletionImportAdapter for JsonAdapter {
    fn parse(&self, raw: &str) -> Result<CompletionMap, EngineError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Render a completion map back to the JSON object format, markers preserved
pub fn to_json(map: &CompletionMap) -> Result<String, EngineError> {
    Ok(serde_json::to_string_pretty(map)?)
}
