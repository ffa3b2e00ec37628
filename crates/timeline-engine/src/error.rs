//! Error types for timeline-engine boundary parsing.
//!
//! Inside the engine, invalid input degrades rather than erroring: a
//! malformed interval yields an empty expansion and a malformed record is
//! skipped. Errors only exist at the strict decode boundaries (a JSON
//! envelope that is not JSON at all, or a caller-supplied instant that must
//! be valid, such as a CLI range flag).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    /// A feed or bulk-fetch payload that is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// An instant string the caller requires to be valid.
    #[error("invalid instant: {0}")]
    InvalidInstant(String),
}

/// Convenience alias used throughout timeline-engine.
pub type Result<T> = std::result::Result<T, TimelineError>;
