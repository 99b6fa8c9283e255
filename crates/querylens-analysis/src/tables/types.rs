//! Table reference types.

use std::fmt;

use serde::{Deserialize, Serialize};

use querylens_core::types::collections::SmallVec6;

/// Table naming convention a reference was recognized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// `catalog.schema.tablename_vw`
    Legacy,
    /// `schema_ptc.ptc_tablename`
    Gridiron,
}

impl NamingScheme {
    pub fn all() -> &'static [NamingScheme] {
        &[Self::Legacy, Self::Gridiron]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Gridiron => "gridiron",
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A recognized table reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableReference {
    /// The substring of the query that matched.
    pub raw_match: String,
    pub naming_scheme: NamingScheme,
    /// Lower-cased table name with scheme prefixes/suffixes stripped.
    pub canonical_name: String,
}

/// A raw match produced by one naming scheme, before overlap resolution,
/// dedup and capping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCandidate {
    /// Byte offset of the match in the query text.
    pub start: usize,
    /// Byte offset one past the end of the match.
    pub end: usize,
    pub reference: TableReference,
}

impl TableCandidate {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn overlaps(&self, other: &TableCandidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Output of the extractor for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableExtraction {
    /// Distinct references in first-seen order, at most six.
    pub references: SmallVec6<TableReference>,
    /// True when more distinct tables were found than the cap retains.
    pub truncated: bool,
    /// Number of distinct canonical names seen before capping.
    pub distinct_seen: usize,
}

impl TableExtraction {
    /// Number of distinct canonical tables retained.
    pub fn table_used_num(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Canonical names in first-seen order.
    pub fn canonical_names(&self) -> Vec<String> {
        self.references.iter().map(|r| r.canonical_name.clone()).collect()
    }

    /// Number of retained references recognized by `scheme`.
    pub fn count_by_scheme(&self, scheme: NamingScheme) -> usize {
        self.references.iter().filter(|r| r.naming_scheme == scheme).count()
    }
}
