//! Query parsing and matching for the filename filter.
//!
//! A query is re-parsed every time it is evaluated. Parsing never fails: any string
//! is a valid query, and malformed boolean input degrades to token-by-token evaluation.
//!
//! Rules are tried in order and the first one that applies wins:
//! - `"some phrase"`: literal, case-insensitive substring
//! - `a AND b`, `a OR b`, `a NOT b`, `a -b`: left-to-right boolean accumulator
//! - `a*b`: anchored wildcard, `*` matches any run of characters
//! - anything else: case-insensitive substring

use crate::types::FileEntry;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Whole-word boolean operators, matched case-insensitively.
static OPERATOR_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:AND|OR|NOT)\b").expect("operator pattern is valid"));

/// How a plain term is folded into the running result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Or,
    And,
}

/// One step of a boolean query, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Switch the combination mode for every following term.
    Mode(Mode),
    /// Reject the candidate outright if it contains this text.
    Exclude(String),
    /// Fold containment of this text into the accumulator.
    Include(String),
}

/// A parsed query.
#[derive(Debug, Clone)]
pub enum Query {
    /// Empty or whitespace-only input.
    All,
    /// Lower-cased phrase with the surrounding quotes removed.
    Phrase(String),
    /// Lower-cased terms in source order.
    Boolean(Vec<Term>),
    /// Anchored, case-insensitive pattern.
    Wildcard(Regex),
    /// Lower-cased needle.
    Substring(String),
}

impl Query {
    /// Parse a raw query string. Leading and trailing whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let query = raw.trim();

        if query.is_empty() {
            return Self::All;
        }

        if query.len() >= 2 && query.starts_with('"') && query.ends_with('"') {
            return Self::Phrase(query[1..query.len() - 1].to_lowercase());
        }

        if is_boolean(query) {
            return Self::Boolean(parse_terms(query));
        }

        if query.contains('*') {
            match wildcard_regex(query) {
                Ok(regex) => return Self::Wildcard(regex),
                Err(e) => {
                    tracing::warn!("Wildcard query '{}' rejected, using substring: {}", query, e);
                }
            }
        }

        Self::Substring(query.to_lowercase())
    }

    /// Decide whether `filename` satisfies this query.
    pub fn matches(&self, filename: &str) -> bool {
        match self {
            Self::All => true,
            Self::Phrase(phrase) => filename.to_lowercase().contains(phrase.as_str()),
            Self::Boolean(terms) => evaluate(terms, &filename.to_lowercase()),
            Self::Wildcard(regex) => regex.is_match(filename),
            Self::Substring(needle) => filename.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Keep the entries whose basename matches, in manifest order.
    pub fn filter<'a>(&self, entries: &'a [FileEntry]) -> Vec<&'a FileEntry> {
        entries.iter().filter(|e| self.matches(e.name())).collect()
    }
}

/// Parse `query` and test it against `filename`.
pub fn matches(query: &str, filename: &str) -> bool {
    Query::parse(query).matches(filename)
}

/// Parse `query` once and keep the matching entries, in manifest order.
pub fn filter<'a>(query: &str, entries: &'a [FileEntry]) -> Vec<&'a FileEntry> {
    Query::parse(query).filter(entries)
}

/// True if the query contains a whole-word operator.
pub(crate) fn has_operator_word(query: &str) -> bool {
    OPERATOR_WORD.is_match(query)
}

fn is_boolean(query: &str) -> bool {
    has_operator_word(query) || query.split_whitespace().any(|t| t.len() > 1 && t.starts_with('-'))
}

fn parse_terms(query: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut negate_next = false;

    for token in query.split_whitespace() {
        if token.eq_ignore_ascii_case("OR") {
            terms.push(Term::Mode(Mode::Or));
        } else if token.eq_ignore_ascii_case("AND") {
            terms.push(Term::Mode(Mode::And));
        } else if token.eq_ignore_ascii_case("NOT") {
            negate_next = true;
        } else if let Some(rest) = token.strip_prefix('-').filter(|r| !r.is_empty()) {
            negate_next = false;
            terms.push(Term::Exclude(rest.to_lowercase()));
        } else if std::mem::take(&mut negate_next) {
            terms.push(Term::Exclude(token.to_lowercase()));
        } else {
            terms.push(Term::Include(token.to_lowercase()));
        }
    }

    terms
}

/// Left-to-right accumulator. Not standard precedence: a mode switch only
/// affects terms that come after it, and the accumulator starts out false.
fn evaluate(terms: &[Term], filename: &str) -> bool {
    let mut include = false;
    let mut mode = Mode::Or;

    for term in terms {
        match term {
            Term::Mode(next) => mode = *next,
            Term::Exclude(text) => {
                if filename.contains(text.as_str()) {
                    return false;
                }
            }
            Term::Include(text) => {
                let hit = filename.contains(text.as_str());
                include = match mode {
                    Mode::Or => include || hit,
                    Mode::And => include && hit,
                };
            }
        }
    }

    include
}

fn wildcard_regex(query: &str) -> Result<Regex, regex::Error> {
    let pattern = query
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    RegexBuilder::new(&format!("^{}$", pattern))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}
