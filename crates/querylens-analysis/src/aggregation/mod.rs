//! Aggregation: analyzed queries rolled up per organization, per table and
//! per data environment.
//!
//! Every fold runs as rayon `fold` + `reduce`: every worker builds partial
//! accumulators and the partials are merged pairwise. No locks.

pub mod environments;
pub mod organization;
pub mod tables;

use rayon::prelude::*;

use querylens_core::tracing::metrics;
use querylens_core::types::collections::FxHashMap;

use crate::analyzer::AnalyzedQuery;

pub use environments::{EnvironmentAccumulator, EnvironmentUsageSummary};
pub use organization::{OrganizationAccumulator, OrganizationUsageSummary};
pub use tables::{TableAccumulator, TableUsageSummary};

type PartialSummaries = FxHashMap<String, OrganizationAccumulator>;

/// Rolls analyzed queries up into usage summaries.
pub struct UsageAggregator;

impl UsageAggregator {
    /// One summary per organization, sorted by organization id.
    pub fn summarize(queries: &[AnalyzedQuery]) -> Vec<OrganizationUsageSummary> {
        let span = tracing::info_span!(
            "querylens.aggregate",
            queries = queries.len(),
            organizations_summarized = tracing::field::Empty,
        );
        let _guard = span.enter();

        let merged: PartialSummaries = queries
            .par_iter()
            .fold(PartialSummaries::default, |mut partial, query| {
                partial
                    .entry(query.organization_id.clone())
                    .or_insert_with(|| OrganizationAccumulator::new(query.organization_id.as_str()))
                    .add(query);
                partial
            })
            .reduce(PartialSummaries::default, merge_partials);

        let mut summaries: Vec<OrganizationUsageSummary> =
            merged.into_values().map(OrganizationAccumulator::finish).collect();
        summaries.sort_by(|a, b| a.organization_id.cmp(&b.organization_id));

        span.record(metrics::ORGANIZATIONS_SUMMARIZED, summaries.len());
        tracing::debug!(organizations = summaries.len(), "organization summaries built");
        summaries
    }

    /// Summary for a single organization's queries. Every query is folded in
    /// regardless of its `organization_id`.
    pub fn summarize_organization(
        organization_id: &str,
        queries: &[AnalyzedQuery],
    ) -> OrganizationUsageSummary {
        let mut acc = OrganizationAccumulator::new(organization_id);
        for query in queries {
            acc.add(query);
        }
        acc.finish()
    }

    /// Per-table usage across every organization.
    pub fn table_usage(queries: &[AnalyzedQuery]) -> Vec<TableUsageSummary> {
        queries
            .par_iter()
            .fold(TableAccumulator::default, |mut acc, query| {
                acc.add(query);
                acc
            })
            .reduce(TableAccumulator::default, |mut a, b| {
                a.merge(b);
                a
            })
            .finish()
    }

    /// Query counts and shares per data environment.
    pub fn environment_usage(queries: &[AnalyzedQuery]) -> Vec<EnvironmentUsageSummary> {
        queries
            .par_iter()
            .fold(EnvironmentAccumulator::default, |mut acc, query| {
                acc.add(query);
                acc
            })
            .reduce(EnvironmentAccumulator::default, |mut a, b| {
                a.merge(b);
                a
            })
            .finish()
    }
}

fn merge_partials(mut a: PartialSummaries, b: PartialSummaries) -> PartialSummaries {
    for (organization_id, acc) in b {
        match a.get_mut(&organization_id) {
            Some(existing) => existing.merge(acc),
            None => {
                a.insert(organization_id, acc);
            }
        }
    }
    a
}
