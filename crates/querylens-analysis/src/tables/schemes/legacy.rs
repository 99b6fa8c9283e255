//! Legacy view references: `catalog.schema.tablename_vw`.

use regex::Regex;

use querylens_core::config::ExtractionConfig;
use querylens_core::errors::DetectionError;

use super::{compile, TableNamingScheme, QUOTE};
use crate::tables::types::{NamingScheme, TableCandidate, TableReference};

pub struct LegacyViewScheme {
    pattern: Regex,
    strip_org_code: bool,
}

impl LegacyViewScheme {
    pub fn new(config: &ExtractionConfig) -> Result<Self, DetectionError> {
        let suffix = regex::escape(config.effective_legacy_view_suffix());
        let pattern = format!(
            r"(?i){QUOTE}\b[a-z_][a-z0-9_]*{QUOTE}\.{QUOTE}[a-z0-9_]+{QUOTE}\.{QUOTE}([a-z0-9_]+?){suffix}\b{QUOTE}"
        );
        Ok(Self {
            pattern: compile(NamingScheme::Legacy, &pattern)?,
            strip_org_code: config.effective_strip_legacy_org_code(),
        })
    }

    /// Lower-case the table token and, when configured, drop its trailing
    /// `_<code>` segment (`game_stats_nyj` -> `game_stats`).
    fn canonicalize(&self, table: &str) -> String {
        let name = table.to_ascii_lowercase();
        if !self.strip_org_code {
            return name;
        }
        match name.rsplit_once('_') {
            Some((head, _)) if !head.is_empty() => head.to_string(),
            _ => name,
        }
    }
}

impl TableNamingScheme for LegacyViewScheme {
    fn scheme(&self) -> NamingScheme {
        NamingScheme::Legacy
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
                        naming_scheme: NamingScheme::Legacy,
                        canonical_name,
                    },
                })
            })
            .collect()
    }
}
