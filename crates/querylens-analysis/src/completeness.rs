//! Completeness classification.
//!
//! A query is complete when at least one table reference was recognized.
//! This is a coverage signal about table-pattern recognition, not about
//! whether the SQL is well formed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tables::types::{NamingScheme, TableExtraction};

/// Which data environment a query predominantly reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataEnvironment {
    #[serde(rename = "legacy")]
    Legacy,
    #[serde(rename = "gridiron")]
    Gridiron,
    /// Equal, non-zero numbers of tables from both schemes.
    #[serde(rename = "mixed")]
    Mixed,
    /// Incomplete query: no recognized tables.
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl DataEnvironment {
    pub fn all() -> &'static [DataEnvironment] {
        &[Self::Legacy, Self::Gridiron, Self::Mixed, Self::NotApplicable]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Gridiron => "gridiron",
            Self::Mixed => "mixed",
            Self::NotApplicable => "n/a",
        }
    }
}

impl fmt::Display for DataEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Completeness verdict for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completeness {
    pub is_complete: bool,
    pub data_environment: DataEnvironment,
}

/// Classify an extraction result.
pub fn classify(extraction: &TableExtraction) -> Completeness {
    let is_complete = extraction.table_used_num() > 0;
    Completeness {
        is_complete,
        data_environment: if is_complete {
            primary_environment(extraction)
        } else {
            DataEnvironment::NotApplicable
        },
    }
}

fn primary_environment(extraction: &TableExtraction) -> DataEnvironment {
    let legacy = extraction.count_by_scheme(NamingScheme::Legacy);
    let gridiron = extraction.count_by_scheme(NamingScheme::Gridiron);
    match legacy.cmp(&gridiron) {
        std::cmp::Ordering::Greater => DataEnvironment::Legacy,
        std::cmp::Ordering::Less => DataEnvironment::Gridiron,
        std::cmp::Ordering::Equal if legacy > 0 => DataEnvironment::Mixed,
        std::cmp::Ordering::Equal => DataEnvironment::NotApplicable,
    }
}
