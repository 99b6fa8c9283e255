//! Error handling for querylens.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod feed_error;
pub mod pipeline_error;
pub mod sink_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::QueryLensErrorCode;
pub use feed_error::FeedError;
pub use pipeline_error::{PipelineError, PipelineResult};
pub use sink_error::SinkError;
