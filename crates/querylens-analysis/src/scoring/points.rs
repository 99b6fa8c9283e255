//! The point schedule.

use serde::{Deserialize, Serialize};

use crate::clauses::types::ConstructKind;

/// How a construct's occurrence count turns into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Points {
    /// Fixed award when the construct is present at all.
    Flat(u32),
    /// Award per occurrence.
    PerOccurrence(u32),
    /// `first` for the first occurrence, `each` for every further one.
    FirstThenEach { first: u32, each: u32 },
}

impl Points {
    /// Points for `occurrences` of the construct. Zero occurrences score zero.
    pub fn award(&self, occurrences: u32) -> u32 {
        if occurrences == 0 {
            return 0;
        }
        match *self {
            Self::Flat(p) => p,
            Self::PerOccurrence(p) => p.saturating_mul(occurrences),
            Self::FirstThenEach { first, each } => {
                first.saturating_add(each.saturating_mul(occurrences - 1))
            }
        }
    }
}

/// One row of the point schedule.
#[derive(Debug, Clone, Copy)]
pub struct PointRule {
    pub kind: ConstructKind,
    /// Human-readable label used in score explanations.
    pub label: &'static str,
    pub points: Points,
}

/// The point schedule, one rule per construct.
pub static POINT_RULES: &[PointRule] = &[
    PointRule { kind: ConstructKind::SpecificColumns, label: "SELECT with specific columns", points: Points::Flat(1) },
    PointRule { kind: ConstructKind::Limit, label: "LIMIT clause", points: Points::Flat(1) },
    PointRule { kind: ConstructKind::OrderBy, label: "ORDER BY", points: Points::Flat(1) },
    PointRule { kind: ConstructKind::Where, label: "WHERE clause", points: Points::Flat(2) },
    PointRule { kind: ConstructKind::Having, label: "HAVING clause", points: Points::Flat(2) },
    PointRule { kind: ConstructKind::GroupBy, label: "GROUP BY", points: Points::Flat(2) },
    PointRule { kind: ConstructKind::Join, label: "Joins", points: Points::PerOccurrence(3) },
    PointRule { kind: ConstructKind::Subquery, label: "Subqueries", points: Points::PerOccurrence(3) },
    PointRule { kind: ConstructKind::SetOperation, label: "Set operations", points: Points::Flat(5) },
    PointRule { kind: ConstructKind::CommonTableExpression, label: "Common Table Expressions", points: Points::Flat(5) },
    PointRule { kind: ConstructKind::Aggregation, label: "Aggregations", points: Points::FirstThenEach { first: 2, each: 1 } },
    PointRule { kind: ConstructKind::WindowFunction, label: "Window functions", points: Points::Flat(6) },
    PointRule { kind: ConstructKind::Pivot, label: "PIVOT/UNPIVOT", points: Points::Flat(6) },
];
