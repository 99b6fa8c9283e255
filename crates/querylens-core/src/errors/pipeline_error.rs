//! Pipeline errors and non-fatal error collection.

use super::error_code::QueryLensErrorCode;
use super::{AnalysisError, ConfigError, DetectionError, FeedError, SinkError};

/// Errors that can occur during a pipeline run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

impl QueryLensErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Feed(e) => e.error_code(),
            Self::Sink(e) => e.error_code(),
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some records fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the pipeline run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: PipelineError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
