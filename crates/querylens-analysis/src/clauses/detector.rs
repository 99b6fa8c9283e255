//! Clause detector: runs every rule over the lexical view of a query.

use super::rules::{default_rules, ClauseRule};
use super::types::ClauseFindings;

pub struct ClauseDetector {
    rules: Vec<Box<dyn ClauseRule>>,
}

impl ClauseDetector {
    /// Detector with all built-in rules.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// Detect constructs in `text`, which should already be masked.
    pub fn detect(&self, text: &str) -> ClauseFindings {
        ClauseFindings::from_counts(self.rules.iter().map(|rule| (rule.kind(), rule.detect(text))))
    }
}

impl Default for ClauseDetector {
    fn default() -> Self {
        Self::new()
    }
}
