//! Per-organization usage accumulation.
//!
//! `OrganizationAccumulator` is a running union/count/sum: `add` and `merge`
//! are commutative and associative, so partial accumulators built on
//! different workers can be merged in any order.

use serde::{Deserialize, Serialize};

use querylens_core::types::collections::{BTreeMap, BTreeSet, FxHashMap};

use crate::analyzer::AnalyzedQuery;
use crate::completeness::DataEnvironment;
use crate::scoring::ComplexityCategory;
use crate::tables::NamingScheme;

/// Finalized usage statistics for one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUsageSummary {
    pub organization_id: String,
    pub unique_legacy_tables: BTreeSet<String>,
    pub unique_gridiron_tables: BTreeSet<String>,
    /// Every category is present, with 0 when no query landed in it.
    pub count_by_category: BTreeMap<ComplexityCategory, usize>,
    /// Every environment is present, with 0 when no query landed in it.
    pub count_by_environment: BTreeMap<DataEnvironment, usize>,
    /// complete / total, 0.0 for an organization with no queries.
    pub completeness_ratio: f64,
    pub total_queries: usize,
    pub complete_queries: usize,
    pub total_score: u64,
    pub average_score: f64,
    pub most_used_legacy_table: Option<String>,
    pub most_used_gridiron_table: Option<String>,
    /// Table references summed over every query.
    pub total_table_references: usize,
    /// Distinct canonical names across both schemes.
    pub unique_tables_used: usize,
    /// `total_table_references + 2 * unique_tables_used`.
    pub engagement_score: usize,
}

/// Running fold state for one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationAccumulator {
    organization_id: String,
    total: usize,
    complete: usize,
    total_score: u64,
    by_category: BTreeMap<ComplexityCategory, usize>,
    by_environment: BTreeMap<DataEnvironment, usize>,
    table_references: usize,
    // canonical name -> number of queries referencing it
    legacy_usage: FxHashMap<String, usize>,
    gridiron_usage: FxHashMap<String, usize>,
}

impl OrganizationAccumulator {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            ..Self::default()
        }
    }

    /// Fold one analyzed query in. The query is assumed to belong to this
    /// organization; the caller does the keying.
    pub fn add(&mut self, query: &AnalyzedQuery) {
        self.total += 1;
        if query.is_complete {
            self.complete += 1;
        }
        self.total_score += u64::from(query.complexity.score);
        *self.by_category.entry(query.complexity.category).or_insert(0) += 1;
        *self.by_environment.entry(query.data_environment).or_insert(0) += 1;
        self.table_references += query.tables.len();

        for table in &query.tables {
            let usage = match table.naming_scheme {
                NamingScheme::Legacy => &mut self.legacy_usage,
                NamingScheme::Gridiron => &mut self.gridiron_usage,
            };
            *usage.entry(table.canonical_name.clone()).or_insert(0) += 1;
        }
    }

    /// Merge another partial accumulator for the same organization.
    pub fn merge(&mut self, other: OrganizationAccumulator) {
        if self.organization_id.is_empty() && self.total == 0 {
            self.organization_id = other.organization_id;
        }
        self.total += other.total;
        self.complete += other.complete;
        self.total_score += other.total_score;
        for (category, n) in other.by_category {
            *self.by_category.entry(category).or_insert(0) += n;
        }
        for (environment, n) in other.by_environment {
            *self.by_environment.entry(environment).or_insert(0) += n;
        }
        self.table_references += other.table_references;
        merge_usage(&mut self.legacy_usage, other.legacy_usage);
        merge_usage(&mut self.gridiron_usage, other.gridiron_usage);
    }

    pub fn finish(self) -> OrganizationUsageSummary {
        let mut count_by_category: BTreeMap<ComplexityCategory, usize> = ComplexityCategory::all()
            .iter()
            .map(|c| (*c, 0))
            .collect();
        for (category, n) in self.by_category {
            count_by_category.insert(category, n);
        }
        let mut count_by_environment: BTreeMap<DataEnvironment, usize> =
            DataEnvironment::all().iter().map(|e| (*e, 0)).collect();
        for (environment, n) in self.by_environment {
            count_by_environment.insert(environment, n);
        }

        let unique_tables_used = self
            .legacy_usage
            .keys()
            .chain(self.gridiron_usage.keys())
            .collect::<BTreeSet<_>>()
            .len();

        let (completeness_ratio, average_score) = if self.total == 0 {
            (0.0, 0.0)
        } else {
            (
                self.complete as f64 / self.total as f64,
                self.total_score as f64 / self.total as f64,
            )
        };

        OrganizationUsageSummary {
            organization_id: self.organization_id,
            unique_legacy_tables: self.legacy_usage.keys().cloned().collect(),
            unique_gridiron_tables: self.gridiron_usage.keys().cloned().collect(),
            most_used_legacy_table: most_used(&self.legacy_usage),
            most_used_gridiron_table: most_used(&self.gridiron_usage),
            count_by_category,
            count_by_environment,
            completeness_ratio,
            total_queries: self.total,
            complete_queries: self.complete,
            total_score: self.total_score,
            average_score,
            total_table_references: self.table_references,
            unique_tables_used,
            engagement_score: self.table_references + 2 * unique_tables_used,
        }
    }
}

fn merge_usage(into: &mut FxHashMap<String, usize>, from: FxHashMap<String, usize>) {
    for (name, n) in from {
        *into.entry(name).or_insert(0) += n;
    }
}

/// Highest count wins; ties go to the lexicographically smallest name so the
/// result does not depend on fold order.
fn most_used(usage: &FxHashMap<String, usize>) -> Option<String> {
    usage
        .iter()
        .max_by(|(a_name, a_n), (b_name, b_n)| a_n.cmp(b_n).then_with(|| b_name.cmp(a_name)))
        .map(|(name, _)| name.clone())
}
