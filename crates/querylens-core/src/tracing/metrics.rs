//! Structured field names used in querylens spans and events.
//!
//! Keeping the names in one place lets log queries rely on them.

/// Batch: number of records analyzed successfully.
pub const QUERIES_ANALYZED: &str = "queries_analyzed";

/// Batch: number of records rejected as malformed.
pub const RECORDS_FAILED: &str = "records_failed";

/// Batch: wall-clock duration of the analysis phase in milliseconds.
pub const BATCH_DURATION_MS: &str = "batch_duration_ms";

/// Aggregation: number of organization summaries produced.
pub const ORGANIZATIONS_SUMMARIZED: &str = "organizations_summarized";

/// Extraction: distinct table candidates dropped by the per-query cap.
pub const TABLES_TRUNCATED: &str = "tables_truncated";
