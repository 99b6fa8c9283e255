//! Table-level usage across all organizations.

use serde::{Deserialize, Serialize};

use querylens_core::types::collections::{BTreeMap, FxHashMap, FxHashSet};

use crate::analyzer::AnalyzedQuery;
use crate::scoring::ComplexityCategory;
use crate::tables::NamingScheme;

/// How widely one canonical table is used, and by how sophisticated queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableUsageSummary {
    pub canonical_name: String,
    pub naming_scheme: NamingScheme,
    /// Number of distinct organizations referencing the table.
    pub organizations: usize,
    /// Number of analyzed queries referencing the table.
    pub query_appearances: usize,
    /// Share of all table references, in percent.
    pub percentage_of_references: f64,
    /// Mean `ComplexityCategory::level` of the referencing queries.
    pub average_complexity_level: f64,
    /// Every category is present, with 0 when no query landed in it.
    pub count_by_category: BTreeMap<ComplexityCategory, usize>,
}

#[derive(Debug, Default, Clone)]
struct TableUsage {
    organizations: FxHashSet<String>,
    query_appearances: usize,
    level_sum: u64,
    by_category: BTreeMap<ComplexityCategory, usize>,
}

/// Fold state keyed by (canonical name, scheme).
#[derive(Debug, Default, Clone)]
pub struct TableAccumulator {
    usage: FxHashMap<(String, NamingScheme), TableUsage>,
}

impl TableAccumulator {
    pub fn add(&mut self, query: &AnalyzedQuery) {
        let category = query.complexity.category;
        for table in &query.tables {
            let entry = self
                .usage
                .entry((table.canonical_name.clone(), table.naming_scheme))
                .or_default();
            entry.query_appearances += 1;
            entry.level_sum += u64::from(category.level());
            *entry.by_category.entry(category).or_insert(0) += 1;
            if !entry.organizations.contains(&query.organization_id) {
                entry.organizations.insert(query.organization_id.clone());
            }
        }
    }

    pub fn merge(&mut self, other: TableAccumulator) {
        for (key, usage) in other.usage {
            let entry = self.usage.entry(key).or_default();
            entry.query_appearances += usage.query_appearances;
            entry.level_sum += usage.level_sum;
            for (category, n) in usage.by_category {
                *entry.by_category.entry(category).or_insert(0) += n;
            }
            entry.organizations.extend(usage.organizations);
        }
    }

    /// Summaries sorted by appearances (desc), then name, then scheme.
    pub fn finish(self) -> Vec<TableUsageSummary> {
        let total_references: usize = self.usage.values().map(|u| u.query_appearances).sum();

        let mut summaries: Vec<TableUsageSummary> = self
            .usage
            .into_iter()
            .map(|((canonical_name, naming_scheme), usage)| {
                let mut count_by_category: BTreeMap<ComplexityCategory, usize> =
                    ComplexityCategory::all().iter().map(|c| (*c, 0)).collect();
                count_by_category.extend(usage.by_category);
                TableUsageSummary {
                    canonical_name,
                    naming_scheme,
                    organizations: usage.organizations.len(),
                    query_appearances: usage.query_appearances,
                    percentage_of_references: percentage(usage.query_appearances, total_references),
                    average_complexity_level: if usage.query_appearances == 0 {
                        0.0
                    } else {
                        usage.level_sum as f64 / usage.query_appearances as f64
                    },
                    count_by_category,
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.query_appearances
                .cmp(&a.query_appearances)
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
                .then_with(|| a.naming_scheme.cmp(&b.naming_scheme))
        });
        summaries
    }
}

/// `part / total` in percent, 0.0 when `total` is zero.
pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
