//! Clause detection: one independent lexical rule per SQL construct.

pub mod detector;
pub mod rules;
pub mod types;

pub use detector::ClauseDetector;
pub use rules::{default_rules, ClauseRule};
pub use types::{ClauseFindings, ConstructKind};
