//! Error types for Color Flip Rush.
//!
//! The simulation itself is infallible; only loading balance overrides can fail.

use std::fmt;

/// Errors that can occur while loading a [`crate::Tuning`] override.
#[derive(Debug)]
pub enum TuningError {
    /// The override was not valid JSON for the tuning schema.
    Parse(serde_json::Error),
    /// A value parsed but is out of range.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "Failed to parse tuning override: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "Invalid tuning value for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}
