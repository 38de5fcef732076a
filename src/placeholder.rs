//! Placeholder token scanning.
//!
//! Template text is a mix of literal spans and `{source.path.to.value}`
//! tokens. A bare `{name}` scans as a token with an empty path; it is only
//! meaningful where `name` is a row or item binding, and template validation
//! rejects it elsewhere. A doubled brace (`{{` or `}}`) stands for a literal brace. A lone
//! `{` with no closing `}`, or a lone `}` outside a token, is an authoring
//! error and is reported as [`Error::MalformedToken`] rather than passed
//! through as text.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Interior grammar: identifier source, then any number of dotted segments.
fn token_grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z0-9_-]+)*$").unwrap()
    })
}

/// One piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text with escapes already collapsed
    Literal(Cow<'a, str>),
    /// A placeholder token
    Token(Token<'a>),
}

/// A `{source.path}` occurrence within a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// Full token text, braces included
    pub raw: &'a str,
    /// Namespace identifier
    pub source: &'a str,
    /// Path segments after the namespace; empty for a bare `{name}`
    pub path: Vec<&'a str>,
    /// Byte offset of the opening brace
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// The dotted reference without braces, e.g. `cfr.recipient.name`.
    pub fn reference(&self) -> &'a str {
        &self.raw[1..self.raw.len() - 1]
    }

    /// Whether the token names a root with no path, e.g. `{row}`.
    pub fn is_bare(&self) -> bool {
        self.path.is_empty()
    }

    /// The error reported for a bare token outside a binding.
    pub fn bare_error(&self) -> Error {
        Error::MalformedToken {
            offset: self.offset,
            reason: format!(
                "placeholder '{}' has no path after its source and names no row or item binding",
                self.raw
            ),
        }
    }
}

/// Scan `text` into alternating literal spans and tokens.
///
/// The returned iterator is lazy and stops after the first error.
pub fn scan(text: &str) -> Scanner<'_> {
    Scanner {
        text,
        pos: 0,
        failed: false,
    }
}

/// Scan `text` eagerly, failing on the first malformed token.
pub fn scan_all(text: &str) -> Result<Vec<Segment<'_>>> {
    scan(text).collect()
}

/// Check whether `text` contains at least one well-formed token.
pub fn has_placeholders(text: &str) -> bool {
    scan(text).any(|segment| matches!(segment, Ok(Segment::Token(_))))
}

/// Parse text that must consist of exactly one token, e.g. `{cyc.funds}`.
///
/// Returns `Ok(None)` when the text is well-formed but is not a lone token.
pub fn single_token(text: &str) -> Result<Option<Token<'_>>> {
    let mut segments = scan_all(text)?;
    if segments.len() != 1 {
        return Ok(None);
    }
    Ok(match segments.remove(0) {
        Segment::Token(token) => Some(token),
        Segment::Literal(_) => None,
    })
}

/// Escape literal braces so `text` scans back to itself.
pub fn escape(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

/// Lazy scanner over one text run.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    failed: bool,
}

impl<'a> Scanner<'a> {
    fn fail(&mut self, offset: usize, reason: impl Into<String>) -> Error {
        self.failed = true;
        Error::MalformedToken {
            offset,
            reason: reason.into(),
        }
    }

    fn literal(&mut self) -> Result<Segment<'a>> {
        let text = self.text;
        let bytes = text.as_bytes();
        let start = self.pos;
        let mut run_start = self.pos;
        let mut owned: Option<String> = None;

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                brace @ (b'{' | b'}') => {
                    if bytes.get(self.pos + 1) == Some(&brace) {
                        let buf = owned.get_or_insert_with(String::new);
                        buf.push_str(&text[run_start..=self.pos]);
                        self.pos += 2;
                        run_start = self.pos;
                    } else if brace == b'{' {
                        break;
                    } else {
                        let offset = self.pos;
                        return Err(self.fail(offset, "unmatched '}' (use '}}' for a literal brace)"));
                    }
                }
                _ => self.pos += 1,
            }
        }

        Ok(match owned {
            Some(mut buf) => {
                buf.push_str(&text[run_start..self.pos]);
                Segment::Literal(Cow::Owned(buf))
            }
            None => Segment::Literal(Cow::Borrowed(&text[start..self.pos])),
        })
    }

    fn token(&mut self) -> Result<Segment<'a>> {
        let text = self.text;
        let start = self.pos;
        let rest = &text[start + 1..];

        let close = match rest.find(['{', '}']) {
            Some(i) if rest.as_bytes()[i] == b'}' => start + 1 + i,
            _ => {
                return Err(self.fail(start, "unclosed '{' (use '{{' for a literal brace)"));
            }
        };

        let raw = &text[start..=close];
        let interior = &text[start + 1..close];

        if interior.is_empty() {
            return Err(self.fail(start, "empty placeholder '{}'"));
        }
        if !token_grammar().is_match(interior) {
            return Err(self.fail(start, format!("invalid placeholder '{}'", raw)));
        }

        let mut parts = interior.split('.');
        let source = parts.next().unwrap_or_default();
        let path = parts.collect();

        self.pos = close + 1;
        Ok(Segment::Token(Token {
            raw,
            source,
            path,
            offset: start,
        }))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.text.len() {
            return None;
        }

        let bytes = self.text.as_bytes();
        if bytes[self.pos] == b'{' && bytes.get(self.pos + 1) != Some(&b'{') {
            Some(self.token())
        } else {
            Some(self.literal())
        }
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}
