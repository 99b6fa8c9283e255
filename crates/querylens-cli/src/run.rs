//! The `analyze` pipeline: feed -> batch analysis -> roll-ups -> sink.

use std::path::PathBuf;

use querylens_analysis::report::{EnvironmentRow, OrganizationRow, QueryRow, TableRow};
use querylens_analysis::{analyze_batch, QueryAnalyzer, UsageAggregator};
use querylens_core::config::{CliOverrides, QueryLensConfig};
use querylens_core::errors::PipelineError;

use crate::feed::{self, InputFormat};
use crate::sink::{OutputFormat, ReportSink};

/// File stem of the per-query result set.
pub const QUERIES_STEM: &str = "analyzed_queries";
/// File stem of the per-organization result set.
pub const ORGANIZATIONS_STEM: &str = "organization_summary";
/// File stem of the per-table result set.
pub const TABLES_STEM: &str = "table_summary";
/// File stem of the per-environment result set.
pub const ENVIRONMENTS_STEM: &str = "environment_summary";

/// Options for one `analyze` run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Inferred from the input extension when unset.
    pub input_format: Option<InputFormat>,
    pub output_format: OutputFormat,
    /// Directory searched for `querylens.toml`.
    pub config_root: PathBuf,
    pub threads: Option<usize>,
}

/// What a run produced.
#[derive(Debug)]
pub struct RunReport {
    pub records_read: usize,
    pub queries_analyzed: usize,
    pub organizations: usize,
    pub tables: usize,
    /// Per-record failures; the run still succeeded.
    pub failures: Vec<PipelineError>,
    pub outputs: Vec<PathBuf>,
}

/// Run the whole pipeline. Fails only on configuration, feed or sink
/// errors; records that cannot be analyzed end up in `RunReport::failures`.
pub fn run_analyze(options: &AnalyzeOptions) -> Result<RunReport, PipelineError> {
    let overrides = CliOverrides {
        batch_threads: options.threads,
        ..CliOverrides::default()
    };
    let config = QueryLensConfig::load(&options.config_root, Some(&overrides))?;
    let analyzer = QueryAnalyzer::new(&config)?;

    let format = options
        .input_format
        .unwrap_or_else(|| InputFormat::from_path(&options.input));
    let records = feed::read_feed(&options.input, format)?;

    let batch = analyze_batch(&analyzer, &records, &config.batch);
    let summaries = UsageAggregator::summarize(&batch.data);
    let tables = UsageAggregator::table_usage(&batch.data);
    let environments = UsageAggregator::environment_usage(&batch.data);

    let sink = ReportSink::new(&options.output_dir, options.output_format)?;
    let query_rows: Vec<QueryRow> = batch.data.iter().map(QueryRow::from).collect();
    let organization_rows: Vec<OrganizationRow> = summaries.iter().map(OrganizationRow::from).collect();
    let table_rows: Vec<TableRow> = tables.iter().map(TableRow::from).collect();
    let environment_rows: Vec<EnvironmentRow> = environments.iter().map(EnvironmentRow::from).collect();
    let outputs = vec![
        sink.write(QUERIES_STEM, &query_rows)?,
        sink.write(ORGANIZATIONS_STEM, &organization_rows)?,
        sink.write(TABLES_STEM, &table_rows)?,
        sink.write(ENVIRONMENTS_STEM, &environment_rows)?,
    ];

    Ok(RunReport {
        records_read: records.len(),
        queries_analyzed: batch.data.len(),
        organizations: summaries.len(),
        tables: tables.len(),
        failures: batch.errors,
        outputs,
    })
}
