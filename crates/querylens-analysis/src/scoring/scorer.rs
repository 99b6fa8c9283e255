//! Complexity scorer.

use serde::{Deserialize, Serialize};

use querylens_core::config::ScoringConfig;

use super::points::{PointRule, POINT_RULES};
use super::tiers::{CategoryTable, ComplexityCategory};
use crate::clauses::types::{ClauseFindings, ConstructKind};

/// Points one construct contributed to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub kind: ConstructKind,
    pub label: String,
    pub points: u32,
}

/// Score and tier for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityResult {
    pub score: u32,
    pub category: ComplexityCategory,
    /// Non-zero contributions in point-schedule order.
    pub breakdown: Vec<ScoreContribution>,
}

impl ComplexityResult {
    /// One-line explanation, e.g. `"WHERE clause (2), Joins (6)"`.
    pub fn explanation(&self) -> String {
        self.breakdown
            .iter()
            .map(|c| format!("{} ({})", c.label, c.points))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Pure function from clause findings to a complexity result.
#[derive(Debug, Clone)]
pub struct ComplexityScorer {
    rules: &'static [PointRule],
    categories: CategoryTable,
}

impl ComplexityScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            rules: POINT_RULES,
            categories: CategoryTable::from_config(config),
        }
    }

    pub fn score(&self, findings: &ClauseFindings) -> ComplexityResult {
        let breakdown: Vec<ScoreContribution> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let points = rule.points.award(findings.count(rule.kind));
                (points > 0).then(|| ScoreContribution {
                    kind: rule.kind,
                    label: rule.label.to_string(),
                    points,
                })
            })
            .collect();

        let score = breakdown
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(c.points));

        ComplexityResult {
            score,
            category: self.categories.categorize(score),
            breakdown,
        }
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(pairs: &[(ConstructKind, u32)]) -> ClauseFindings {
        ClauseFindings::from_counts(pairs.iter().copied())
    }

    #[test]
    fn test_empty_findings_score_zero() {
        let result = ComplexityScorer::default().score(&ClauseFindings::default());
        assert_eq!(result.score, 0);
        assert_eq!(result.category, ComplexityCategory::BasicExploratory);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.explanation(), "");
    }

    #[test]
    fn test_reporting_query_points() {
        let result = ComplexityScorer::default().score(&findings(&[
            (ConstructKind::SpecificColumns, 1),
            (ConstructKind::Limit, 1),
            (ConstructKind::OrderBy, 1),
            (ConstructKind::Where, 1),
            (ConstructKind::Having, 1),
            (ConstructKind::GroupBy, 1),
            (ConstructKind::Aggregation, 1),
        ]));
        assert_eq!(result.score, 11);
        assert_eq!(result.category, ComplexityCategory::Analytical);
    }

    #[test]
    fn test_counted_constructs_scale() {
        let result = ComplexityScorer::default().score(&findings(&[
            (ConstructKind::Join, 3),
            (ConstructKind::Subquery, 2),
            (ConstructKind::Aggregation, 4),
        ]));
        // 3*3 + 2*3 + (2 + 3)
        assert_eq!(result.score, 20);
        assert_eq!(result.category, ComplexityCategory::ComplexAnalytical);
    }

    #[test]
    fn test_explanation_lists_contributions() {
        let result = ComplexityScorer::default().score(&findings(&[
            (ConstructKind::Where, 1),
            (ConstructKind::Join, 2),
        ]));
        assert_eq!(result.explanation(), "WHERE clause (2), Joins (6)");
    }
}
