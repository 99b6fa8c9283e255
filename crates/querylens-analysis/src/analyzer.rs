//! Per-query analysis: extraction, clause detection, scoring and
//! completeness assembled into one `AnalyzedQuery`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use querylens_core::config::QueryLensConfig;
use querylens_core::errors::{AnalysisError, DetectionError};
use querylens_core::types::collections::SmallVec6;

use crate::clauses::ClauseDetector;
use crate::completeness::{self, DataEnvironment};
use crate::lexical::mask_literals;
use crate::scoring::{ComplexityResult, ComplexityScorer};
use crate::tables::{TableExtractor, TableReference};

/// One entry of the input feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryRecord {
    pub organization_id: String,
    /// `None` when the feed had no text for this record.
    pub query_text: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    /// Set when the feed held query text that could not be decoded;
    /// `query_text` is `None` then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

impl QueryRecord {
    pub fn new(organization_id: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            query_text: Some(query_text.into()),
            submitted_at: None,
            decode_error: None,
        }
    }
}

/// Analysis output for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedQuery {
    pub organization_id: String,
    pub submitted_at: Option<NaiveDateTime>,
    /// Distinct references in first-seen order, at most six.
    pub tables: SmallVec6<TableReference>,
    pub table_used_num: usize,
    pub is_complete: bool,
    pub complexity: ComplexityResult,
    pub data_environment: DataEnvironment,
    /// More distinct tables were referenced than were retained.
    pub tables_truncated: bool,
}

impl AnalyzedQuery {
    pub fn canonical_table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.canonical_name.clone()).collect()
    }
}

/// Stateless query analyzer. Shareable across threads.
pub struct QueryAnalyzer {
    extractor: TableExtractor,
    detector: ClauseDetector,
    scorer: ComplexityScorer,
}

impl QueryAnalyzer {
    pub fn new(config: &QueryLensConfig) -> Result<Self, DetectionError> {
        Ok(Self {
            extractor: TableExtractor::new(&config.extraction)?,
            detector: ClauseDetector::new(),
            scorer: ComplexityScorer::new(&config.scoring),
        })
    }

    /// Analyze one feed record.
    ///
    /// `index` is the record's position in the feed and is only used to
    /// identify it in the error.
    pub fn analyze(&self, index: usize, record: &QueryRecord) -> Result<AnalyzedQuery, AnalysisError> {
        if let Some(message) = &record.decode_error {
            return Err(AnalysisError::UndecodableText {
                record_index: index,
                organization_id: record.organization_id.clone(),
                message: message.clone(),
            });
        }
        let text = record
            .query_text
            .as_deref()
            .ok_or_else(|| AnalysisError::MissingQueryText {
                record_index: index,
                organization_id: record.organization_id.clone(),
            })?;
        let mut analyzed = self.analyze_text(&record.organization_id, text);
        analyzed.submitted_at = record.submitted_at;
        Ok(analyzed)
    }

    /// Analyze raw query text. Never fails: text that matches nothing
    /// yields an incomplete query with an empty table list.
    pub fn analyze_text(&self, organization_id: &str, text: &str) -> AnalyzedQuery {
        let masked = mask_literals(text);
        let extraction = self.extractor.extract(&masked);
        let findings = self.detector.detect(&masked);
        let complexity = self.scorer.score(&findings);
        let verdict = completeness::classify(&extraction);

        AnalyzedQuery {
            organization_id: organization_id.to_string(),
            submitted_at: None,
            table_used_num: extraction.table_used_num(),
            is_complete: verdict.is_complete,
            data_environment: verdict.data_environment,
            tables_truncated: extraction.truncated,
            tables: extraction.references,
            complexity,
        }
    }
}
