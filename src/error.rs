//! Error types
//!
//! None of these end the process: storage errors are logged and dropped,
//! tuning errors fall back to the built-in balance.

use thiserror::Error;

/// Failure reported by a key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// No storage available (private browsing, headless host)
    #[error("storage unavailable")]
    Unavailable,
    /// Backend refused the write because it is full
    #[error("storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },
    /// Any other backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A tuning file that could not be used
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
