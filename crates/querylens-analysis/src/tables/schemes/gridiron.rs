//! Gridiron references: `schema_ptc.ptc_tablename`.

use regex::Regex;

use querylens_core::config::ExtractionConfig;
use querylens_core::errors::DetectionError;

use super::{compile, TableNamingScheme, QUOTE};
use crate::tables::types::{NamingScheme, TableCandidate, TableReference};

pub struct GridironScheme {
    pattern: Regex,
    table_prefix: String,
}

impl GridironScheme {
    pub fn new(config: &ExtractionConfig) -> Result<Self, DetectionError> {
        let schema_suffix = regex::escape(config.effective_gridiron_schema_suffix());
        let pattern = format!(
            r"(?i){QUOTE}\b[a-z0-9_]*{schema_suffix}{QUOTE}\.{QUOTE}([a-z0-9_]+)\b{QUOTE}"
        );
        Ok(Self {
            pattern: compile(NamingScheme::Gridiron, &pattern)?,
            table_prefix: config.effective_gridiron_table_prefix().to_ascii_lowercase(),
        })
    }

    /// Lower-case the table token and strip the table prefix when present.
    fn canonicalize(&self, table: &str) -> String {
        let name = table.to_ascii_lowercase();
        match name.strip_prefix(self.table_prefix.as_str()) {
            Some(rest) => rest.to_string(),
            None => name,
        }
    }
}

impl TableNamingScheme for GridironScheme {
    fn scheme(&self) -> NamingScheme {
        NamingScheme::Gridiron
    }

    fn find(&self, text: &str) -> Vec<TableCandidate> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let table = caps.get(1)?;
                let canonical_name = self.canonicalize(table.as_str());
                if canonical_name.is_empty() {
                    return None;
                }
                Some(TableCandidate {
                    start: whole.start(),
                    end: whole.end(),
                    reference: TableReference {
                        raw_match: whole.as_str().to_string(),
                        naming_scheme: NamingScheme::Gridiron,
                        canonical_name,
                    },
                })
            })
            .collect()
    }
}
