//! Complexity tiers and the threshold lookup table.

use std::fmt;

use serde::{Deserialize, Serialize};

use querylens_core::config::ScoringConfig;

/// Ordered complexity tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityCategory {
    #[serde(rename = "Basic Exploratory")]
    BasicExploratory,
    #[serde(rename = "Focused Exploratory")]
    FocusedExploratory,
    #[serde(rename = "Analytical")]
    Analytical,
    #[serde(rename = "Complex Analytical")]
    ComplexAnalytical,
}

impl ComplexityCategory {
    pub fn all() -> &'static [ComplexityCategory] {
        &[
            Self::BasicExploratory,
            Self::FocusedExploratory,
            Self::Analytical,
            Self::ComplexAnalytical,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BasicExploratory => "Basic Exploratory",
            Self::FocusedExploratory => "Focused Exploratory",
            Self::Analytical => "Analytical",
            Self::ComplexAnalytical => "Complex Analytical",
        }
    }

    /// 1-based sophistication level, used when averaging categories.
    pub fn level(&self) -> u8 {
        match self {
            Self::BasicExploratory => 1,
            Self::FocusedExploratory => 2,
            Self::Analytical => 3,
            Self::ComplexAnalytical => 4,
        }
    }
}

impl fmt::Display for ComplexityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monotonic step function from score to category.
///
/// Each entry is an inclusive upper bound; scores above the last bound map
/// to `top`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    bounds: Vec<(u32, ComplexityCategory)>,
    top: ComplexityCategory,
}

impl CategoryTable {
    /// Build the table from scoring configuration.
    /// Bounds are expected to be validated as strictly increasing.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            bounds: vec![
                (config.effective_basic_exploratory_max(), ComplexityCategory::BasicExploratory),
                (config.effective_focused_exploratory_max(), ComplexityCategory::FocusedExploratory),
                (config.effective_analytical_max(), ComplexityCategory::Analytical),
            ],
            top: ComplexityCategory::ComplexAnalytical,
        }
    }

    pub fn categorize(&self, score: u32) -> ComplexityCategory {
        self.bounds
            .iter()
            .find(|(max, _)| score <= *max)
            .map_or(self.top, |(_, category)| *category)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}
