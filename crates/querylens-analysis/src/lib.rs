//! # querylens-analysis
//!
//! Query analysis engine. Per query: lexical masking, table reference
//! extraction across the legacy and gridiron naming schemes, clause
//! detection, complexity scoring and completeness. Across queries: a
//! parallel batch driver and per-organization, per-table and per-environment
//! aggregation.

pub mod aggregation;
pub mod analyzer;
pub mod batch;
pub mod clauses;
pub mod completeness;
pub mod lexical;
pub mod report;
pub mod scoring;
pub mod tables;

pub use aggregation::{
    EnvironmentUsageSummary, OrganizationUsageSummary, TableUsageSummary, UsageAggregator,
};
pub use analyzer::{AnalyzedQuery, QueryAnalyzer, QueryRecord};
pub use batch::analyze_batch;
pub use completeness::DataEnvironment;
pub use scoring::{ComplexityCategory, ComplexityResult};
pub use tables::{NamingScheme, TableReference};
