//! Error types for Habitflux

use thiserror::Error;

/// Errors that can occur at the engine's edges.
///
/// The aggregation core itself is total: missing data yields defaults
/// (zero counts, zero score, empty streak list). Errors originate only in
/// the adapter and store surfaces.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to parse day key: {0}")]
    DateParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("Unknown habit: {0}")]
    UnknownHabit(uuid::Uuid),

    #[error("Failed to parse import payload: {0}")]
    ParseError(String),
}
