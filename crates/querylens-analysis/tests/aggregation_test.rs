//! Batch analysis followed by organization and table roll-ups.

use querylens_analysis::report::{FlatRow, OrganizationRow, QueryRow, TableRow};
use querylens_analysis::{analyze_batch, ComplexityCategory, QueryAnalyzer, QueryRecord, UsageAggregator};
use querylens_core::config::{BatchConfig, QueryLensConfig};
use querylens_core::errors::{PipelineError, QueryLensErrorCode};

fn feed() -> Vec<QueryRecord> {
    vec![
        QueryRecord::new("NYJ", "SELECT * FROM AwsDataCatalog.sales.orders_vw"),
        QueryRecord::new(
            "NYJ",
            "SELECT id, name FROM sales_ptc.ptc_orders WHERE amount > 100 \
             GROUP BY name HAVING COUNT(*) > 5 ORDER BY name LIMIT 10",
        ),
        QueryRecord {
            organization_id: "NYJ".to_string(),
            query_text: None,
            ..Default::default()
        },
        QueryRecord::new("NE", "SELECT 1"),
        QueryRecord::new("NE", "SELECT * FROM crm_ptc.ptc_fans JOIN crm_ptc.ptc_orders o ON 1 = 1"),
    ]
}

#[test]
fn malformed_record_is_reported_and_excluded_from_summaries() {
    let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
    let result = analyze_batch(&analyzer, &feed(), &BatchConfig::default());

    assert_eq!(result.data.len(), 4);
    assert_eq!(result.error_count(), 1);
    let err = &result.errors[0];
    assert!(matches!(err, PipelineError::Analysis(_)));
    assert!(err.report_string().starts_with("[ANALYSIS_ERROR]"));

    let summaries = UsageAggregator::summarize(&result.data);
    assert_eq!(summaries.len(), 2);

    let ne = &summaries[0];
    assert_eq!(ne.organization_id, "NE");
    assert_eq!(ne.total_queries, 2);
    assert_eq!(ne.completeness_ratio, 0.5);
    assert_eq!(
        ne.unique_gridiron_tables.iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["fans", "orders"]
    );

    let nyj = &summaries[1];
    assert_eq!(nyj.organization_id, "NYJ");
    assert_eq!(nyj.total_queries, 2);
    assert_eq!(nyj.completeness_ratio, 1.0);
    assert!(nyj.unique_legacy_tables.contains("orders"));
    assert!(nyj.unique_gridiron_tables.contains("orders"));
    assert_eq!(nyj.count_by_category[&ComplexityCategory::BasicExploratory], 1);
    assert_eq!(nyj.count_by_category[&ComplexityCategory::Analytical], 1);
    assert_eq!(nyj.count_by_category[&ComplexityCategory::ComplexAnalytical], 0);
    assert_eq!(nyj.total_score, 11);
    assert_eq!(nyj.average_score, 5.5);
}

#[test]
fn sequential_and_parallel_batches_agree() {
    let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
    let parallel = analyze_batch(&analyzer, &feed(), &BatchConfig::default());
    let sequential = analyze_batch(
        &analyzer,
        &feed(),
        &BatchConfig {
            threads: None,
            parallel: Some(false),
        },
    );

    assert_eq!(parallel.data, sequential.data);
    assert_eq!(
        UsageAggregator::summarize(&parallel.data),
        UsageAggregator::summarize(&sequential.data)
    );
}

#[test]
fn table_summary_counts_organizations_and_appearances() {
    let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
    let result = analyze_batch(&analyzer, &feed(), &BatchConfig::default());
    let tables = UsageAggregator::table_usage(&result.data);

    let rows: Vec<TableRow> = tables.iter().map(TableRow::from).collect();
    let flat: Vec<Vec<String>> = rows.iter().map(FlatRow::fields).collect();
    assert_eq!(
        flat,
        vec![
            vec!["orders", "gridiron", "2", "2", "50.00", "2.50", "0", "1", "1", "0"],
            vec!["fans", "gridiron", "1", "1", "25.00", "2.00", "0", "1", "0", "0"],
            vec!["orders", "legacy", "1", "1", "25.00", "1.00", "1", "0", "0", "0"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect::<Vec<_>>())
        .collect::<Vec<_>>()
    );
}

#[test]
fn rows_serialize_to_json() {
    let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
    let result = analyze_batch(&analyzer, &feed(), &BatchConfig::default());

    let row = QueryRow::from(&result.data[1]);
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["complexity_score"], 11);
    assert_eq!(json["complexity_category"], "Analytical");
    assert_eq!(json["canonical_table_names"][0], "orders");
    assert_eq!(json["data_environment"], "gridiron");

    let summaries = UsageAggregator::summarize(&result.data);
    let org = serde_json::to_value(OrganizationRow::from(&summaries[0])).unwrap();
    assert_eq!(org["organization_id"], "NE");
    assert_eq!(org["count_by_category"]["Basic Exploratory"], 1);
    assert_eq!(org["count_by_category"]["Focused Exploratory"], 1);
}
