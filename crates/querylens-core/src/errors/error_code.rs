//! QueryLensErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this so callers at the outer surface
/// (the CLI, a downstream sink) can report a stable code string.
pub trait QueryLensErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted report string: `[ERROR_CODE] message`.
    fn report_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";
pub const FEED_ERROR: &str = "FEED_ERROR";
pub const SINK_ERROR: &str = "SINK_ERROR";
