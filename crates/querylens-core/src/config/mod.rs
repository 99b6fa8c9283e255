//! Configuration system for querylens.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod batch_config;
pub mod extraction_config;
pub mod querylens_config;
pub mod scoring_config;

pub use batch_config::BatchConfig;
pub use extraction_config::ExtractionConfig;
pub use querylens_config::{CliOverrides, QueryLensConfig};
pub use scoring_config::ScoringConfig;
