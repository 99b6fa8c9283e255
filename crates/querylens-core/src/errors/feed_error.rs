//! Input feed errors.

use super::error_code::{self, QueryLensErrorCode};

/// Errors that can occur while reading the query-log input feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed feed entry at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("Feed is missing required column: {column}")]
    MissingColumn { column: String },
}

impl QueryLensErrorCode for FeedError {
    fn error_code(&self) -> &'static str {
        error_code::FEED_ERROR
    }
}
