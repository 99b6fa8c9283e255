//! Lexical clause rules.
//!
//! Every construct is matched by its own rule so new constructs can be added
//! without touching existing ones. Keywords match as whole tokens,
//! case-insensitively, so identifiers like `checksum` or `order_id` never
//! trigger a rule.

use std::sync::LazyLock;

use regex::Regex;

use super::types::ConstructKind;

macro_rules! clause_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

clause_pattern!(RE_SELECT, r"(?i)\bSELECT\b");
clause_pattern!(RE_WILDCARD_SELECT, r"(?i)\bSELECT\s+(?:(?:DISTINCT|ALL)\s+)?\*");
clause_pattern!(RE_LIMIT, r"(?i)\bLIMIT\b");
clause_pattern!(RE_ORDER_BY, r"(?i)\bORDER\s+BY\b");
clause_pattern!(RE_WHERE, r"(?i)\bWHERE\b");
clause_pattern!(RE_HAVING, r"(?i)\bHAVING\b");
clause_pattern!(RE_GROUP_BY, r"(?i)\bGROUP\s+BY\b");
clause_pattern!(RE_JOIN, r"(?i)\bJOIN\b");
clause_pattern!(RE_SUBQUERY, r"(?i)\(\s*SELECT\b");
clause_pattern!(RE_SET_OPERATION, r"(?i)\b(?:UNION|INTERSECT|EXCEPT)\b");
clause_pattern!(RE_LEADING_WITH, r"(?i)\A\s*WITH\b");
clause_pattern!(RE_AGGREGATION, r"(?i)\b(?:COUNT|SUM|AVG|MAX|MIN)\s*\(");
clause_pattern!(RE_WINDOW, r"(?i)\bOVER\s*\(");
clause_pattern!(RE_PIVOT, r"(?i)\b(?:PIVOT|UNPIVOT)\b");

/// Trait every clause rule implements.
pub trait ClauseRule: Send + Sync {
    /// The construct this rule detects.
    fn kind(&self) -> ConstructKind;

    /// Occurrences of the construct in `text` (0 = absent).
    fn detect(&self, text: &str) -> u32;
}

/// Matches when the pattern occurs at least once.
pub struct PresenceRule {
    kind: ConstructKind,
    pattern: &'static LazyLock<Option<Regex>>,
}

impl PresenceRule {
    pub const fn new(kind: ConstructKind, pattern: &'static LazyLock<Option<Regex>>) -> Self {
        Self { kind, pattern }
    }
}

impl ClauseRule for PresenceRule {
    fn kind(&self) -> ConstructKind {
        self.kind
    }

    fn detect(&self, text: &str) -> u32 {
        match self.pattern.as_ref() {
            Some(re) if re.is_match(text) => 1,
            _ => 0,
        }
    }
}

/// Counts non-overlapping occurrences of the pattern.
pub struct CountRule {
    kind: ConstructKind,
    pattern: &'static LazyLock<Option<Regex>>,
}

impl CountRule {
    pub const fn new(kind: ConstructKind, pattern: &'static LazyLock<Option<Regex>>) -> Self {
        Self { kind, pattern }
    }
}

impl ClauseRule for CountRule {
    fn kind(&self) -> ConstructKind {
        self.kind
    }

    fn detect(&self, text: &str) -> u32 {
        self.pattern
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count() as u32)
    }
}

/// A `SELECT` list naming specific columns: some `SELECT` exists and no
/// `SELECT` list starts with the `*` wildcard.
pub struct SpecificColumnsRule;

impl ClauseRule for SpecificColumnsRule {
    fn kind(&self) -> ConstructKind {
        ConstructKind::SpecificColumns
    }

    fn detect(&self, text: &str) -> u32 {
        let (Some(select), Some(wildcard)) = (RE_SELECT.as_ref(), RE_WILDCARD_SELECT.as_ref())
        else {
            return 0;
        };
        u32::from(select.is_match(text) && !wildcard.is_match(text))
    }
}

/// All built-in rules, one per `ConstructKind`.
pub fn default_rules() -> Vec<Box<dyn ClauseRule>> {
    vec![
        Box::new(SpecificColumnsRule),
        Box::new(PresenceRule::new(ConstructKind::Limit, &RE_LIMIT)),
        Box::new(PresenceRule::new(ConstructKind::OrderBy, &RE_ORDER_BY)),
        Box::new(PresenceRule::new(ConstructKind::Where, &RE_WHERE)),
        Box::new(PresenceRule::new(ConstructKind::Having, &RE_HAVING)),
        Box::new(PresenceRule::new(ConstructKind::GroupBy, &RE_GROUP_BY)),
        Box::new(CountRule::new(ConstructKind::Join, &RE_JOIN)),
        Box::new(CountRule::new(ConstructKind::Subquery, &RE_SUBQUERY)),
        Box::new(PresenceRule::new(ConstructKind::SetOperation, &RE_SET_OPERATION)),
        Box::new(PresenceRule::new(ConstructKind::CommonTableExpression, &RE_LEADING_WITH)),
        Box::new(CountRule::new(ConstructKind::Aggregation, &RE_AGGREGATION)),
        Box::new(PresenceRule::new(ConstructKind::WindowFunction, &RE_WINDOW)),
        Box::new(PresenceRule::new(ConstructKind::Pivot, &RE_PIVOT)),
    ]
}

/// Number of built-in rules whose pattern compiled.
pub fn compiled_pattern_count() -> usize {
    [
        &RE_SELECT, &RE_WILDCARD_SELECT, &RE_LIMIT, &RE_ORDER_BY, &RE_WHERE,
        &RE_HAVING, &RE_GROUP_BY, &RE_JOIN, &RE_SUBQUERY, &RE_SET_OPERATION,
        &RE_LEADING_WITH, &RE_AGGREGATION, &RE_WINDOW, &RE_PIVOT,
    ]
    .iter()
    .filter(|p| p.is_some())
    .count()
}
