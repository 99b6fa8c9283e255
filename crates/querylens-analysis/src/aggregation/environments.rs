//! Query counts per data environment across the whole feed.

use serde::{Deserialize, Serialize};

use querylens_core::types::collections::BTreeMap;

use crate::analyzer::AnalyzedQuery;
use crate::completeness::DataEnvironment;

use super::tables::percentage;

/// How many queries read from one data environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentUsageSummary {
    pub data_environment: DataEnvironment,
    pub query_count: usize,
    /// Share of all analyzed queries, in percent.
    pub percentage: f64,
}

/// Running tally per environment. Commutative and associative like the
/// other accumulators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvironmentAccumulator {
    counts: BTreeMap<DataEnvironment, usize>,
}

impl EnvironmentAccumulator {
    pub fn add(&mut self, query: &AnalyzedQuery) {
        *self.counts.entry(query.data_environment).or_insert(0) += 1;
    }

    pub fn merge(&mut self, other: EnvironmentAccumulator) {
        for (environment, n) in other.counts {
            *self.counts.entry(environment).or_insert(0) += n;
        }
    }

    /// Environments that saw at least one query, most used first; ties keep
    /// `DataEnvironment` order.
    pub fn finish(self) -> Vec<EnvironmentUsageSummary> {
        let total: usize = self.counts.values().sum();
        let mut summaries: Vec<EnvironmentUsageSummary> = self
            .counts
            .into_iter()
            .map(|(data_environment, query_count)| EnvironmentUsageSummary {
                data_environment,
                query_count,
                percentage: percentage(query_count, total),
            })
            .collect();
        // stable sort: BTreeMap order survives among equal counts
        summaries.sort_by(|a, b| b.query_count.cmp(&a.query_count));
        summaries
    }
}
