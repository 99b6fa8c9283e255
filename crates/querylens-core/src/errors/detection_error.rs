//! Detection errors.

use super::error_code::{self, QueryLensErrorCode};

/// Errors raised while building the lexical detectors.
///
/// Detection itself never fails on query text; these only surface when a
/// naming scheme or rule is constructed from bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Pattern for {scheme} failed to compile: {message}")]
    PatternCompilationFailed { scheme: String, message: String },
}

impl QueryLensErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        error_code::DETECTION_ERROR
    }
}
