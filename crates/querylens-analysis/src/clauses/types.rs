//! Clause detection types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// SQL constructs the detector looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    SpecificColumns,
    Limit,
    OrderBy,
    Where,
    Having,
    GroupBy,
    Join,
    Subquery,
    SetOperation,
    CommonTableExpression,
    Aggregation,
    WindowFunction,
    Pivot,
}

impl ConstructKind {
    pub fn all() -> &'static [ConstructKind] {
        &[
            Self::SpecificColumns, Self::Limit, Self::OrderBy, Self::Where,
            Self::Having, Self::GroupBy, Self::Join, Self::Subquery,
            Self::SetOperation, Self::CommonTableExpression, Self::Aggregation,
            Self::WindowFunction, Self::Pivot,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SpecificColumns => "specific_columns", Self::Limit => "limit",
            Self::OrderBy => "order_by", Self::Where => "where",
            Self::Having => "having", Self::GroupBy => "group_by",
            Self::Join => "join", Self::Subquery => "subquery",
            Self::SetOperation => "set_operation",
            Self::CommonTableExpression => "common_table_expression",
            Self::Aggregation => "aggregation",
            Self::WindowFunction => "window_function", Self::Pivot => "pivot",
        }
    }

    /// Whether the scoring rule needs the number of occurrences rather than
    /// plain presence.
    pub fn is_counted(&self) -> bool {
        matches!(self, Self::Join | Self::Subquery | Self::Aggregation)
    }
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Constructs detected in one query. Presence-only constructs are stored with
/// a count of 1; absent constructs are not stored at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseFindings {
    counts: BTreeMap<ConstructKind, u32>,
}

impl ClauseFindings {
    /// Build findings from `(kind, occurrences)` pairs. Zero counts are
    /// dropped and presence-only kinds are clamped to 1.
    pub fn from_counts(pairs: impl IntoIterator<Item = (ConstructKind, u32)>) -> Self {
        let mut counts = BTreeMap::new();
        for (kind, n) in pairs {
            if n == 0 {
                continue;
            }
            let n = if kind.is_counted() { n } else { 1 };
            counts.insert(kind, n);
        }
        Self { counts }
    }

    /// Number of occurrences (1 for any present presence-only construct).
    pub fn count(&self, kind: ConstructKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_present(&self, kind: ConstructKind) -> bool {
        self.counts.contains_key(&kind)
    }

    /// Detected constructs in `ConstructKind` order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstructKind, u32)> + '_ {
        self.counts.iter().map(|(k, n)| (*k, *n))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
