//! Table extraction configuration.

use serde::{Deserialize, Serialize};

/// Maximum number of distinct tables retained per query.
///
/// Caps pathological inputs; downstream consumers size their per-query
/// table columns against it, so it is not configurable.
pub const MAX_TABLES_PER_QUERY: usize = 6;

/// Configuration for the naming-scheme matchers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Suffix marking a legacy view table name. Default: `_vw`.
    pub legacy_view_suffix: Option<String>,
    /// Suffix marking a gridiron schema token. Default: `_ptc`.
    pub gridiron_schema_suffix: Option<String>,
    /// Prefix stripped from gridiron table names. Default: `ptc_`.
    pub gridiron_table_prefix: Option<String>,
    /// Also strip the trailing `_<code>` segment of legacy table names. Default: false.
    pub strip_legacy_org_code: Option<bool>,
}

impl ExtractionConfig {
    /// Returns the effective legacy view suffix, defaulting to `_vw`.
    pub fn effective_legacy_view_suffix(&self) -> &str {
        self.legacy_view_suffix.as_deref().unwrap_or("_vw")
    }

    /// Returns the effective gridiron schema suffix, defaulting to `_ptc`.
    pub fn effective_gridiron_schema_suffix(&self) -> &str {
        self.gridiron_schema_suffix.as_deref().unwrap_or("_ptc")
    }

    /// Returns the effective gridiron table prefix, defaulting to `ptc_`.
    pub fn effective_gridiron_table_prefix(&self) -> &str {
        self.gridiron_table_prefix.as_deref().unwrap_or("ptc_")
    }

    /// Returns whether legacy org codes are stripped, defaulting to false.
    pub fn effective_strip_legacy_org_code(&self) -> bool {
        self.strip_legacy_org_code.unwrap_or(false)
    }
}
