//! Wildcard and user-supplied regular expression matching.
//!
//! Patterns come straight from user queries, so compilation failures are
//! expected input, not bugs. Callers get a [`PatternError`] and decide how to
//! report it; the ranking engine turns it into a non-fatal diagnostic.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the compiled size of a user pattern.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Which pattern syntax a query was interpreted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// `*` / `?` glob syntax.
    Wildcard,
    /// A `/.../` delimited regular expression.
    Regex,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Wildcard => f.write_str("wildcard"),
            PatternKind::Regex => f.write_str("regex"),
        }
    }
}

/// A pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid {kind} pattern {pattern:?}: {reason}")]
pub struct PatternError {
    /// Syntax the pattern was compiled as.
    pub kind: PatternKind,
    /// The pattern text as given.
    pub pattern: String,
    /// Compiler message.
    pub reason: String,
}

fn compile(kind: PatternKind, source: &str, original: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| PatternError {
            kind,
            pattern: original.to_owned(),
            reason: e.to_string(),
        })
}

/// Translate a wildcard pattern into regex source.
///
/// `*` matches any run of characters, `?` exactly one, and whitespace runs
/// match one or more whitespace characters. Everything else is literal.
///
/// ```
/// use collegematch::pattern::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("st. x*"), r"st\.\s+x.*");
/// assert_eq!(wildcard_to_regex("n?t"), "n.t");
/// ```
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut literal = String::new();
    let mut in_space = false;

    for c in pattern.chars() {
        let is_space = c.is_whitespace();
        if is_space && in_space {
            continue;
        }
        in_space = is_space;

        if !(c == '*' || c == '?' || is_space) {
            literal.push(c);
            continue;
        }

        out.push_str(&regex::escape(&literal));
        literal.clear();
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(r"\s+"),
        }
    }
    out.push_str(&regex::escape(&literal));
    out
}

/// Whether `query` uses wildcard syntax.
pub fn is_wildcard_query(query: &str) -> bool {
    memchr::memchr2(b'*', b'?', query.as_bytes()).is_some()
}

/// The body of a `/.../` delimited regex query, if `query` is one.
///
/// ```
/// use collegematch::pattern::regex_body;
///
/// assert_eq!(regex_body("/^iit/"), Some("^iit"));
/// assert_eq!(regex_body("//"), Some(""));
/// assert_eq!(regex_body("/"), None);
/// assert_eq!(regex_body("iit"), None);
/// ```
pub fn regex_body(query: &str) -> Option<&str> {
    query
        .strip_prefix('/')
        .and_then(|rest| rest.strip_suffix('/'))
}

/// A compiled, case-insensitive, unanchored wildcard pattern.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    /// Compile `pattern` from wildcard syntax.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = compile(PatternKind::Wildcard, &wildcard_to_regex(pattern), pattern)?;
        Ok(Self { regex })
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A compiled, case-insensitive user regular expression.
#[derive(Debug, Clone)]
pub struct RegexPattern {
    regex: Regex,
}

impl RegexPattern {
    /// Compile `pattern` as a regular expression.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = compile(PatternKind::Regex, pattern, pattern)?;
        Ok(Self { regex })
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// One-shot wildcard match. An uncompilable pattern never matches.
///
/// ```
/// use collegematch::pattern::wildcard_match;
///
/// assert!(wildcard_match("iit*delhi", "IIT Delhi"));
/// assert!(wildcard_match("n?t", "NIT Trichy"));
/// assert!(!wildcard_match("st. x*", "Stax"));
/// ```
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    WildcardPattern::new(pattern).is_ok_and(|p| p.is_match(text))
}

/// One-shot regex match. An invalid pattern fails closed.
///
/// ```
/// use collegematch::pattern::regex_match;
///
/// assert!(regex_match("^aiims", "AIIMS Delhi"));
/// assert!(!regex_match("[", "anything"));
/// ```
pub fn regex_match(pattern: &str, text: &str) -> bool {
    RegexPattern::new(pattern).is_ok_and(|p| p.is_match(text))
}
