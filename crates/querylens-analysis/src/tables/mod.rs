//! Table reference extraction: two naming schemes normalized to one
//! canonical table identifier.

pub mod extractor;
pub mod schemes;
pub mod types;

pub use extractor::TableExtractor;
pub use schemes::{create_all_schemes, TableNamingScheme};
pub use types::{NamingScheme, TableCandidate, TableExtraction, TableReference};
