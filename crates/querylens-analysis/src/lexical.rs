//! Lexical view of raw query text.
//!
//! Detection is keyword/pattern based, so string literals and comments are
//! blanked out first: a `'group by'` literal or a commented-out table must not
//! count. Masking replaces characters with spaces and keeps every byte offset,
//! so matches on the masked text line up with the original.
//!
//! The text is tokenized with `sqlparser` and only literal and comment tokens
//! are blanked, so quoted identifiers (`"it's"`, `` `a--b` ``) survive intact.
//! Text the tokenizer rejects (an unterminated literal, say) goes through a
//! byte scan instead.

use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Location, Token, TokenWithSpan, Tokenizer, Whitespace};

/// Return a same-length copy of `text` with the bodies of string literals,
/// `--` line comments and `/* */` block comments replaced by spaces.
///
/// Quote characters of a literal are kept. Line breaks inside comments or
/// literals are kept so line-oriented patterns still see them. Unterminated
/// literals and comments mask to the end of the text.
pub fn mask_literals(text: &str) -> String {
    let dialect = GenericDialect {};
    let mut out = text.as_bytes().to_vec();

    match Tokenizer::new(&dialect, text).tokenize_with_location() {
        Ok(tokens) => mask_tokens(text, &tokens, &mut out),
        Err(e) => {
            tracing::trace!(error = %e, "tokenizer rejected query text, using byte scan");
            mask_bytes(text.as_bytes(), &mut out);
        }
    }

    // Every multi-byte sequence was either kept whole or fully blanked, so
    // the buffer is still valid UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn mask_tokens(text: &str, tokens: &[TokenWithSpan], out: &mut [u8]) {
    let positions = Positions::new(text);
    for token in tokens {
        let literal = is_literal(&token.token);
        if !literal && !is_comment(&token.token) {
            continue;
        }
        let (Some(start), Some(end)) = (
            positions.byte_offset(token.span.start),
            positions.byte_offset(token.span.end),
        ) else {
            continue;
        };
        if start >= end {
            continue;
        }
        if literal {
            blank_literal(out, start, end);
        } else {
            blank(out, start, end);
        }
    }
}

fn is_literal(token: &Token) -> bool {
    matches!(
        token,
        Token::SingleQuotedString(_)
            | Token::NationalStringLiteral(_)
            | Token::EscapedStringLiteral(_)
            | Token::UnicodeStringLiteral(_)
            | Token::HexStringLiteral(_)
            | Token::SingleQuotedByteStringLiteral(_)
            | Token::DollarQuotedString(_)
    )
}

fn is_comment(token: &Token) -> bool {
    matches!(
        token,
        Token::Whitespace(Whitespace::SingleLineComment { .. } | Whitespace::MultiLineComment(_))
    )
}

/// Blank a literal token spanning `out[start..end]`, keeping its prefix
/// (`N`, `E`, `X`, ...) and quote characters.
fn blank_literal(out: &mut [u8], start: usize, end: usize) {
    let body_start = out[start..end]
        .iter()
        .position(|&b| b == b'\'')
        .map_or(start, |p| start + p + 1);
    let body_end = if end > body_start && out[end - 1] == b'\'' {
        end - 1
    } else {
        end
    };
    if body_start < body_end {
        blank(out, body_start, body_end);
    }
}

/// Maps tokenizer locations (1-based line, 1-based column counted in
/// characters) to byte offsets.
struct Positions {
    /// Character index at which each line starts.
    line_starts: Vec<usize>,
    /// Byte offset of each character, plus `text.len()` as a sentinel.
    char_bytes: Vec<usize>,
}

impl Positions {
    fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut char_bytes = Vec::with_capacity(text.len() + 1);
        for (idx, (byte, ch)) in text.char_indices().enumerate() {
            char_bytes.push(byte);
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }
        char_bytes.push(text.len());
        Self {
            line_starts,
            char_bytes,
        }
    }

    fn byte_offset(&self, location: Location) -> Option<usize> {
        let line = usize::try_from(location.line).ok()?.checked_sub(1)?;
        let column = usize::try_from(location.column).ok()?.checked_sub(1)?;
        let line_start = *self.line_starts.get(line)?;
        self.char_bytes.get(line_start + column).copied()
    }
}

/// Byte-scan masking for text the tokenizer could not handle. Double-quoted
/// and backtick identifiers are skipped over unmasked.
fn mask_bytes(bytes: &[u8], out: &mut [u8]) {
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\'' {
                        // '' is an escaped quote inside the literal
                        if bytes.get(i + 1) == Some(&b'\'') {
                            blank(out, i, i + 2);
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    blank(out, i, i + 1);
                    i += 1;
                }
                // closing quote (if any)
                i += 1;
            }
            quote @ (b'"' | b'`') => {
                i = bytes[i + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |p| i + 1 + p + 1);
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p);
                blank(out, i, end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_subslice(&bytes[i + 2..], b"*/")
                    .map_or(bytes.len(), |p| i + 2 + p + 2);
                blank(out, i, end);
                i = end;
            }
            _ => i += 1,
        }
    }
}

/// Blank `out[start..end]`, leaving line breaks in place.
fn blank(out: &mut [u8], start: usize, end: usize) {
    for b in &mut out[start..end] {
        if *b != b'\n' && *b != b'\r' {
            *b = b' ';
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_masked() {
        let masked = mask_literals("SELECT * FROM t WHERE note = 'group by x'");
        assert_eq!(masked, "SELECT * FROM t WHERE note = '          '");
    }

    #[test]
    fn test_escaped_quote_stays_inside_literal() {
        let masked = mask_literals("WHERE a = 'it''s ORDER BY' AND b = 1");
        assert!(!masked.contains("ORDER"));
        assert!(masked.ends_with("AND b = 1"));
    }

    #[test]
    fn test_comments_masked() {
        let masked = mask_literals("SELECT a -- JOIN b\nFROM t /* UNION */ LIMIT 1");
        assert!(!masked.contains("JOIN"));
        assert!(!masked.contains("UNION"));
        assert!(masked.contains("LIMIT 1"));
        assert!(masked.contains('\n'));
    }

    #[test]
    fn test_length_preserved_with_multibyte_text() {
        let text = "SELECT 'café ☕' AS x -- naïve\nFROM t";
        let masked = mask_literals(text);
        assert_eq!(masked.len(), text.len());
        assert!(masked.starts_with("SELECT '"));
        assert!(masked.ends_with("\nFROM t"));
        assert!(!masked.contains("naïve"));
    }

    #[test]
    fn test_literal_after_multibyte_line_is_located() {
        let text = "SELECT \"é\" AS a,\n  'WHERE' AS b FROM t";
        let masked = mask_literals(text);
        assert_eq!(masked.len(), text.len());
        assert!(masked.contains("\"é\""));
        assert!(!masked.contains("WHERE"));
        assert!(masked.ends_with("AS b FROM t"));
    }

    #[test]
    fn test_unterminated_literal_masks_to_end() {
        let masked = mask_literals("SELECT 'oops WHERE x");
        assert!(!masked.contains("WHERE"));
    }

    #[test]
    fn test_quoted_identifier_with_apostrophe_untouched() {
        let text = "SELECT \"it's\" FROM s_ptc.ptc_x WHERE a = 1";
        assert_eq!(mask_literals(text), text);
    }

    #[test]
    fn test_quoted_identifier_with_dashes_untouched() {
        let text = "SELECT \"a--b\" FROM s_ptc.ptc_x WHERE a = 1";
        assert_eq!(mask_literals(text), text);
    }

    #[test]
    fn test_backtick_identifier_untouched() {
        let text = "SELECT `it's--here` FROM s_ptc.ptc_x WHERE a = 'LIMIT'";
        let masked = mask_literals(text);
        assert!(masked.starts_with("SELECT `it's--here` FROM s_ptc.ptc_x WHERE a = '"));
        assert!(!masked.contains("LIMIT"));
    }

    #[test]
    fn test_byte_scan_skips_quoted_identifiers() {
        // the trailing literal is unterminated, so the tokenizer gives up
        let masked = mask_literals("SELECT \"it's\" FROM s_ptc.ptc_x WHERE a = 'open");
        assert!(masked.starts_with("SELECT \"it's\" FROM s_ptc.ptc_x WHERE a = '"));
        assert!(!masked.contains("open"));
    }
}
