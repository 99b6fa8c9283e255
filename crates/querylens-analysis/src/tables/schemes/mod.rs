//! Naming-scheme matchers. One implementation per table-naming convention;
//! adding a convention means adding one more `TableNamingScheme`.

pub mod gridiron;
pub mod legacy;

use regex::Regex;

use querylens_core::config::ExtractionConfig;
use querylens_core::errors::DetectionError;

use super::types::{NamingScheme, TableCandidate};

/// Optional identifier quoting accepted around each dotted name part.
pub(crate) const QUOTE: &str = r#"["`]?"#;

/// Trait for recognizing and normalizing one table-naming convention.
pub trait TableNamingScheme: Send + Sync {
    /// Which convention this matcher handles.
    fn scheme(&self) -> NamingScheme;

    /// Find every reference of this convention in `text`, in textual order.
    /// Never fails: text that matches nothing yields an empty list.
    fn find(&self, text: &str) -> Vec<TableCandidate>;
}

/// Create all built-in naming schemes for the given configuration.
pub fn create_all_schemes(
    config: &ExtractionConfig,
) -> Result<Vec<Box<dyn TableNamingScheme>>, DetectionError> {
    Ok(vec![
        Box::new(legacy::LegacyViewScheme::new(config)?),
        Box::new(gridiron::GridironScheme::new(config)?),
    ])
}

/// Compile a scheme pattern, mapping failures onto `DetectionError`.
pub(crate) fn compile(scheme: NamingScheme, pattern: &str) -> Result<Regex, DetectionError> {
    Regex::new(pattern).map_err(|e| DetectionError::PatternCompilationFailed {
        scheme: scheme.name().to_string(),
        message: e.to_string(),
    })
}
