//! Output sink errors.

use super::error_code::{self, QueryLensErrorCode};

/// Errors that can occur while emitting result sets.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Failed to write {path}: {message}")]
    Io { path: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(String),
}

impl QueryLensErrorCode for SinkError {
    fn error_code(&self) -> &'static str {
        error_code::SINK_ERROR
    }
}
