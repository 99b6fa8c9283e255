//! # querylens-cli
//!
//! Thin batch wrapper around the analysis engine: reads a query-log feed,
//! runs the analysis, and writes the per-query, per-organization and
//! per-table result sets.

pub mod feed;
pub mod run;
pub mod sink;

pub use feed::InputFormat;
pub use run::{run_analyze, AnalyzeOptions, RunReport};
pub use sink::OutputFormat;
