//! Error types
//!
//! Nothing in the per-frame path is fatal. These cover bad configuration
//! and malformed landmark input at the boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a finite number, got {value}")]
    InvalidValue { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("unknown preset '{0}' (expected combined, punch, kick or move)")]
    UnknownPreset(String),

    #[error("no actions enabled")]
    NoActionsEnabled,
}

#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("expected 0, 99 or 132 landmark values, got {0}")]
    BadLength(usize),

    #[error("timestamp must be finite, got {0}")]
    NonFiniteTimestamp(f64),
}
