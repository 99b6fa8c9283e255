//! Output rows handed to a sink.
//!
//! The row structs serialize directly to JSON. Tabular sinks use
//! `FlatRow`, which joins list columns with `;` and spreads category and
//! environment counts over one column each.

use chrono::NaiveDateTime;
use serde::Serialize;

use querylens_core::types::collections::BTreeMap;

use crate::aggregation::{EnvironmentUsageSummary, OrganizationUsageSummary, TableUsageSummary};
use crate::analyzer::AnalyzedQuery;
use crate::completeness::DataEnvironment;
use crate::scoring::ComplexityCategory;
use crate::tables::NamingScheme;

/// Separator for list-valued columns in tabular output.
pub const LIST_SEPARATOR: &str = ";";

/// A row that can be written to a tabular sink.
pub trait FlatRow {
    fn header() -> Vec<String>;
    fn fields(&self) -> Vec<String>;
}

/// One row per analyzed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRow {
    pub organization_id: String,
    pub submitted_at: Option<NaiveDateTime>,
    pub table_used_num: usize,
    pub is_complete: bool,
    pub complexity_score: u32,
    pub complexity_category: ComplexityCategory,
    pub canonical_table_names: Vec<String>,
    pub data_environment: DataEnvironment,
    pub tables_truncated: bool,
    pub explanation: String,
}

impl From<&AnalyzedQuery> for QueryRow {
    fn from(q: &AnalyzedQuery) -> Self {
        Self {
            organization_id: q.organization_id.clone(),
            submitted_at: q.submitted_at,
            table_used_num: q.table_used_num,
            is_complete: q.is_complete,
            complexity_score: q.complexity.score,
            complexity_category: q.complexity.category,
            canonical_table_names: q.canonical_table_names(),
            data_environment: q.data_environment,
            tables_truncated: q.tables_truncated,
            explanation: q.complexity.explanation(),
        }
    }
}

impl FlatRow for QueryRow {
    fn header() -> Vec<String> {
        owned(&[
            "organization_id",
            "submitted_at",
            "table_used_num",
            "is_complete",
            "complexity_score",
            "complexity_category",
            "canonical_table_names",
            "data_environment",
            "tables_truncated",
            "explanation",
        ])
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.organization_id.clone(),
            self.submitted_at.map(|t| t.to_string()).unwrap_or_default(),
            self.table_used_num.to_string(),
            self.is_complete.to_string(),
            self.complexity_score.to_string(),
            self.complexity_category.to_string(),
            self.canonical_table_names.join(LIST_SEPARATOR),
            self.data_environment.to_string(),
            self.tables_truncated.to_string(),
            self.explanation.clone(),
        ]
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn category_columns() -> impl Iterator<Item = String> {
    ComplexityCategory::all().iter().map(|c| c.label().to_string())
}

/// One value per category, in `ComplexityCategory::all` order.
fn category_fields(counts: &BTreeMap<String, usize>) -> impl Iterator<Item = String> + '_ {
    ComplexityCategory::all()
        .iter()
        .map(move |c| counts.get(c.label()).copied().unwrap_or(0).to_string())
}

fn category_counts(counts: &BTreeMap<ComplexityCategory, usize>) -> BTreeMap<String, usize> {
    counts.iter().map(|(c, n)| (c.label().to_string(), *n)).collect()
}

/// One row per organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganizationRow {
    pub organization_id: String,
    pub unique_legacy_tables: Vec<String>,
    pub unique_gridiron_tables: Vec<String>,
    /// Keyed by category label.
    pub count_by_category: BTreeMap<String, usize>,
    /// Keyed by environment name.
    pub count_by_environment: BTreeMap<String, usize>,
    pub completeness_ratio: f64,
    pub total_queries: usize,
    pub complete_queries: usize,
    pub average_score: f64,
    pub most_used_legacy_table: Option<String>,
    pub most_used_gridiron_table: Option<String>,
    pub total_table_references: usize,
    pub unique_tables_used: usize,
    pub engagement_score: usize,
}

impl From<&OrganizationUsageSummary> for OrganizationRow {
    fn from(s: &OrganizationUsageSummary) -> Self {
        Self {
            organization_id: s.organization_id.clone(),
            unique_legacy_tables: s.unique_legacy_tables.iter().cloned().collect(),
            unique_gridiron_tables: s.unique_gridiron_tables.iter().cloned().collect(),
            count_by_category: category_counts(&s.count_by_category),
            count_by_environment: s
                .count_by_environment
                .iter()
                .map(|(e, n)| (e.name().to_string(), *n))
                .collect(),
            completeness_ratio: s.completeness_ratio,
            total_queries: s.total_queries,
            complete_queries: s.complete_queries,
            average_score: s.average_score,
            most_used_legacy_table: s.most_used_legacy_table.clone(),
            most_used_gridiron_table: s.most_used_gridiron_table.clone(),
            total_table_references: s.total_table_references,
            unique_tables_used: s.unique_tables_used,
            engagement_score: s.engagement_score,
        }
    }
}

impl FlatRow for OrganizationRow {
    fn header() -> Vec<String> {
        let mut header = owned(&["organization_id", "unique_legacy_tables", "unique_gridiron_tables"]);
        header.extend(category_columns());
        header.extend(DataEnvironment::all().iter().map(|e| format!("{}_queries", e.name())));
        header.extend(owned(&[
            "completeness_ratio",
            "total_queries",
            "complete_queries",
            "average_score",
            "most_used_legacy_table",
            "most_used_gridiron_table",
            "total_table_references",
            "unique_tables_used",
            "engagement_score",
        ]));
        header
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.organization_id.clone(),
            self.unique_legacy_tables.join(LIST_SEPARATOR),
            self.unique_gridiron_tables.join(LIST_SEPARATOR),
        ];
        fields.extend(category_fields(&self.count_by_category));
        fields.extend(DataEnvironment::all().iter().map(|e| {
            self.count_by_environment
                .get(e.name())
                .copied()
                .unwrap_or(0)
                .to_string()
        }));
        fields.extend([
            format!("{:.4}", self.completeness_ratio),
            self.total_queries.to_string(),
            self.complete_queries.to_string(),
            format!("{:.2}", self.average_score),
            self.most_used_legacy_table.clone().unwrap_or_default(),
            self.most_used_gridiron_table.clone().unwrap_or_default(),
            self.total_table_references.to_string(),
            self.unique_tables_used.to_string(),
            self.engagement_score.to_string(),
        ]);
        fields
    }
}

/// One row per canonical table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub canonical_name: String,
    pub naming_scheme: NamingScheme,
    pub organizations: usize,
    pub query_appearances: usize,
    pub percentage_of_references: f64,
    pub average_complexity_level: f64,
    /// Keyed by category label.
    pub count_by_category: BTreeMap<String, usize>,
}

impl From<&TableUsageSummary> for TableRow {
    fn from(s: &TableUsageSummary) -> Self {
        Self {
            canonical_name: s.canonical_name.clone(),
            naming_scheme: s.naming_scheme,
            organizations: s.organizations,
            query_appearances: s.query_appearances,
            percentage_of_references: s.percentage_of_references,
            average_complexity_level: s.average_complexity_level,
            count_by_category: category_counts(&s.count_by_category),
        }
    }
}

impl FlatRow for TableRow {
    fn header() -> Vec<String> {
        let mut header = owned(&[
            "canonical_name",
            "naming_scheme",
            "organizations",
            "query_appearances",
            "percentage_of_references",
            "average_complexity_level",
        ]);
        header.extend(category_columns());
        header
    }

    fn fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.canonical_name.clone(),
            self.naming_scheme.to_string(),
            self.organizations.to_string(),
            self.query_appearances.to_string(),
            format!("{:.2}", self.percentage_of_references),
            format!("{:.2}", self.average_complexity_level),
        ];
        fields.extend(category_fields(&self.count_by_category));
        fields
    }
}

/// One row per data environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentRow {
    pub data_environment: DataEnvironment,
    pub query_count: usize,
    pub percentage: f64,
}

impl From<&EnvironmentUsageSummary> for EnvironmentRow {
    fn from(s: &EnvironmentUsageSummary) -> Self {
        Self {
            data_environment: s.data_environment,
            query_count: s.query_count,
            percentage: s.percentage,
        }
    }
}

impl FlatRow for EnvironmentRow {
    fn header() -> Vec<String> {
        owned(&["data_environment", "query_count", "percentage"])
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.data_environment.to_string(),
            self.query_count.to_string(),
            format!("{:.2}", self.percentage),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::OrganizationAccumulator;
    use crate::analyzer::QueryAnalyzer;
    use querylens_core::config::QueryLensConfig;

    #[test]
    fn test_query_row_fields_line_up_with_header() {
        let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
        let q = analyzer.analyze_text(
            "MIA",
            "SELECT id FROM s_ptc.ptc_a JOIN AwsDataCatalog.x.b_vw ON 1 = 1",
        );
        let row = QueryRow::from(&q);
        assert_eq!(row.fields().len(), QueryRow::header().len());
        assert_eq!(row.fields()[6], "a;b");
        assert_eq!(row.fields()[7], "mixed");
        assert_eq!(row.explanation, "SELECT with specific columns (1), Joins (3)");
    }

    #[test]
    fn test_organization_row_spreads_categories() {
        let row = OrganizationRow::from(&OrganizationAccumulator::new("MIA").finish());
        let header = OrganizationRow::header();
        let fields = row.fields();
        assert_eq!(fields.len(), header.len());
        let idx = header.iter().position(|h| h == "Complex Analytical").unwrap();
        assert_eq!(fields[idx], "0");
        assert_eq!(fields[header.iter().position(|h| h == "completeness_ratio").unwrap()], "0.0000");
        assert_eq!(fields[header.iter().position(|h| h == "n/a_queries").unwrap()], "0");
        assert_eq!(header.last().map(String::as_str), Some("engagement_score"));
    }

    #[test]
    fn test_table_and_environment_rows_line_up_with_header() {
        let analyzer = QueryAnalyzer::new(&QueryLensConfig::default()).unwrap();
        let queries = vec![
            analyzer.analyze_text("MIA", "SELECT * FROM s_ptc.ptc_a"),
            analyzer.analyze_text("MIA", "SELECT id FROM s_ptc.ptc_a WHERE id = 1"),
        ];

        let tables = crate::aggregation::UsageAggregator::table_usage(&queries);
        let row = TableRow::from(&tables[0]);
        let header = TableRow::header();
        let fields = row.fields();
        assert_eq!(fields.len(), header.len());
        assert_eq!(fields[4], "100.00");
        // Basic Exploratory (1) and Focused Exploratory (2)
        assert_eq!(fields[5], "1.50");

        let envs = crate::aggregation::UsageAggregator::environment_usage(&queries);
        let row = EnvironmentRow::from(&envs[0]);
        assert_eq!(row.fields(), vec!["gridiron", "2", "100.00"]);
        assert_eq!(row.fields().len(), EnvironmentRow::header().len());
    }
}
