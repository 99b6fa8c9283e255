//! Batch driver: analyze a whole feed, in parallel or sequentially.
//!
//! Records are independent, so analysis is a plain `par_iter` with no
//! shared state. Output order matches input order. A record that cannot be
//! analyzed is reported in `PipelineResult::errors` and never aborts the
//! batch.

use std::time::Instant;

use rayon::prelude::*;

use querylens_core::config::BatchConfig;
use querylens_core::errors::{AnalysisError, PipelineError, PipelineResult};
use querylens_core::tracing::metrics;

use crate::analyzer::{AnalyzedQuery, QueryAnalyzer, QueryRecord};

/// Analyze every record in `records`.
pub fn analyze_batch(
    analyzer: &QueryAnalyzer,
    records: &[QueryRecord],
    config: &BatchConfig,
) -> PipelineResult<Vec<AnalyzedQuery>> {
    let span = tracing::info_span!(
        "querylens.batch",
        records = records.len(),
        queries_analyzed = tracing::field::Empty,
        records_failed = tracing::field::Empty,
        batch_duration_ms = tracing::field::Empty,
        tables_truncated = tracing::field::Empty,
    );
    let _guard = span.enter();
    let start = Instant::now();

    let outcomes = if config.effective_parallel() {
        analyze_parallel(analyzer, records, config.effective_threads())
    } else {
        analyze_sequential(analyzer, records)
    };

    let mut result = PipelineResult::new(Vec::with_capacity(records.len()));
    for outcome in outcomes {
        match outcome {
            Ok(analyzed) => result.data.push(analyzed),
            Err(e) => {
                tracing::warn!(
                    record_index = e.record_index(),
                    error = %e,
                    "skipping record"
                );
                result.add_error(PipelineError::Analysis(e));
            }
        }
    }

    let truncated = result.data.iter().filter(|q| q.tables_truncated).count();
    span.record(metrics::QUERIES_ANALYZED, result.data.len());
    span.record(metrics::RECORDS_FAILED, result.error_count());
    span.record(metrics::BATCH_DURATION_MS, start.elapsed().as_millis() as u64);
    span.record(metrics::TABLES_TRUNCATED, truncated);
    tracing::info!(
        analyzed = result.data.len(),
        failed = result.error_count(),
        "batch analysis complete"
    );

    result
}

fn analyze_parallel(
    analyzer: &QueryAnalyzer,
    records: &[QueryRecord],
    threads: usize,
) -> Vec<Result<AnalyzedQuery, AnalysisError>> {
    let run = || -> Vec<Result<AnalyzedQuery, AnalysisError>> {
        records
            .par_iter()
            .enumerate()
            .map(|(index, record)| analyzer.analyze(index, record))
            .collect()
    };

    if threads == 0 {
        return run();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!(threads, error = %e, "could not build thread pool, using the global pool");
            run()
        }
    }
}

fn analyze_sequential(
    analyzer: &QueryAnalyzer,
    records: &[QueryRecord],
) -> Vec<Result<AnalyzedQuery, AnalysisError>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| analyzer.analyze(index, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use querylens_core::config::QueryLensConfig;

    fn records() -> Vec<QueryRecord> {
        vec![
            QueryRecord::new("A", "SELECT * FROM s_ptc.ptc_one"),
            QueryRecord {
                organization_id: "B".to_string(),
                query_text: None,
                ..Default::default()
            },
            QueryRecord::new("C", "SELECT id FROM AwsDataCatalog.x.two_vw WHERE id > 1"),
        ]
    }

    #[test]
    fn test_failures_are_isolated_and_order_kept() {
        let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
        for parallel in [true, false] {
            let config = BatchConfig {
                threads: Some(2),
                parallel: Some(parallel),
            };
            let result = analyze_batch(&analyzer, &records(), &config);
            assert_eq!(result.error_count(), 1);
            let orgs: Vec<&str> = result.data.iter().map(|q| q.organization_id.as_str()).collect();
            assert_eq!(orgs, vec!["A", "C"]);
            match &result.errors[0] {
                PipelineError::Analysis(e) => assert_eq!(e.record_index(), 1),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_batch() {
        let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
        let result = analyze_batch(&analyzer, &[], &BatchConfig::default());
        assert!(result.is_clean());
        assert!(result.data.is_empty());
    }
}
