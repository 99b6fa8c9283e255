//! Table reference extractor: runs every naming scheme, resolves overlaps,
//! dedups by canonical name and applies the per-query cap.

use querylens_core::config::extraction_config::MAX_TABLES_PER_QUERY;
use querylens_core::config::ExtractionConfig;
use querylens_core::errors::DetectionError;
use querylens_core::types::collections::FxHashSet;

use super::schemes::{create_all_schemes, TableNamingScheme};
use super::types::{TableCandidate, TableExtraction};

/// Extracts canonical table references from query text.
pub struct TableExtractor {
    schemes: Vec<Box<dyn TableNamingScheme>>,
}

impl TableExtractor {
    /// Build an extractor with all built-in schemes.
    pub fn new(config: &ExtractionConfig) -> Result<Self, DetectionError> {
        Ok(Self {
            schemes: create_all_schemes(config)?,
        })
    }

    /// Extract at most six distinct table references, in first-seen order.
    ///
    /// `text` should already be the lexical view (see `lexical::mask_literals`).
    /// Never fails; text without recognizable references yields an empty result.
    pub fn extract(&self, text: &str) -> TableExtraction {
        let mut candidates: Vec<TableCandidate> = self
            .schemes
            .iter()
            .flat_map(|scheme| scheme.find(text))
            .collect();

        // Textual order; on equal start the longer (more specific) match first.
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));
        let candidates = drop_overlapping(candidates);

        let mut seen = FxHashSet::default();
        let mut extraction = TableExtraction::default();
        for candidate in candidates {
            if !seen.insert(candidate.reference.canonical_name.clone()) {
                continue;
            }
            if extraction.references.len() < MAX_TABLES_PER_QUERY {
                extraction.references.push(candidate.reference);
            } else {
                extraction.truncated = true;
            }
        }
        extraction.distinct_seen = seen.len();

        if extraction.truncated {
            tracing::debug!(
                distinct_seen = extraction.distinct_seen,
                retained = MAX_TABLES_PER_QUERY,
                "table reference cap reached, extra tables dropped"
            );
        }
        extraction
    }
}

/// Keep the first of every group of overlapping candidates.
/// Input must be sorted by start, longest first on ties.
fn drop_overlapping(sorted: Vec<TableCandidate>) -> Vec<TableCandidate> {
    let mut kept: Vec<TableCandidate> = Vec::with_capacity(sorted.len());
    for candidate in sorted {
        match kept.last() {
            Some(last) if last.overlaps(&candidate) => {}
            _ => kept.push(candidate),
        }
    }
    kept
}
