//! Complexity category thresholds.

use serde::{Deserialize, Serialize};

/// Upper score bounds (inclusive) for each complexity tier.
///
/// Scores above `analytical_max` fall into the top tier. Point values
/// themselves are fixed; only the tier boundaries are configurable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Highest score still "Basic Exploratory". Default: 2.
    pub basic_exploratory_max: Option<u32>,
    /// Highest score still "Focused Exploratory". Default: 6.
    pub focused_exploratory_max: Option<u32>,
    /// Highest score still "Analytical". Default: 13.
    pub analytical_max: Option<u32>,
}

impl ScoringConfig {
    /// Returns the effective basic exploratory bound, defaulting to 2.
    pub fn effective_basic_exploratory_max(&self) -> u32 {
        self.basic_exploratory_max.unwrap_or(2)
    }

    /// Returns the effective focused exploratory bound, defaulting to 6.
    pub fn effective_focused_exploratory_max(&self) -> u32 {
        self.focused_exploratory_max.unwrap_or(6)
    }

    /// Returns the effective analytical bound, defaulting to 13.
    pub fn effective_analytical_max(&self) -> u32 {
        self.analytical_max.unwrap_or(13)
    }
}
