//! Complexity scoring: additive point rules, then a threshold lookup.
//!
//! Point accumulation and tier boundaries are kept apart: the point table
//! lives in `points`, the boundaries in `tiers`.

pub mod points;
pub mod scorer;
pub mod tiers;

pub use points::{PointRule, Points, POINT_RULES};
pub use scorer::{ComplexityResult, ComplexityScorer, ScoreContribution};
pub use tiers::{CategoryTable, ComplexityCategory};
