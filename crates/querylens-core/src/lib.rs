//! # querylens-core
//!
//! Foundation crate for the querylens usage analyzer.
//! Defines errors, configuration, tracing setup, and shared collection types.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::QueryLensConfig;
pub use errors::{PipelineError, PipelineResult, QueryLensErrorCode};
