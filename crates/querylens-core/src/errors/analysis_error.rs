//! Per-record analysis failures.

use super::error_code::{self, QueryLensErrorCode};

/// A single input record that could not be analyzed.
///
/// These are isolated per record: the batch keeps going and reports them
/// alongside the successful results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Record {record_index} ({organization_id}) has no query text")]
    MissingQueryText {
        record_index: usize,
        organization_id: String,
    },

    #[error("Record {record_index} ({organization_id}) has undecodable query text: {message}")]
    UndecodableText {
        record_index: usize,
        organization_id: String,
        message: String,
    },
}

impl AnalysisError {
    /// Position of the failing record in the input feed.
    pub fn record_index(&self) -> usize {
        match self {
            Self::MissingQueryText { record_index, .. }
            | Self::UndecodableText { record_index, .. } => *record_index,
        }
    }
}

impl QueryLensErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        error_code::ANALYSIS_ERROR
    }
}
