//! "Did you mean" ranking by edit distance.
//!
//! Suggestions are computed from the raw query against every entry's basename,
//! independently of the strict filter. A suggestion can appear when nothing matched,
//! and also when plenty did.

use crate::types::FileEntry;
use rapidfuzz::distance::levenshtein;
use serde::Serialize;

/// Default number of suggestions offered.
pub const DEFAULT_LIMIT: usize = 5;

/// Queries must be longer than this (in characters) to get suggestions.
pub const MIN_QUERY_CHARS: usize = 2;

/// A near-miss entry and its distance from the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion<'a> {
    pub entry: &'a FileEntry,
    /// 0 for an exact match, 1 for containment, otherwise the edit distance.
    pub score: usize,
}

/// Distance between a query and a basename, ignoring case.
///
/// - 0: equal
/// - 1: `name` contains `query`
/// - otherwise: Levenshtein distance with unit costs
pub fn score(query: &str, name: &str) -> usize {
    let query = query.to_lowercase();
    let name = name.to_lowercase();

    if name == query {
        0
    } else if name.contains(&query) {
        1
    } else {
        levenshtein::distance(query.chars(), name.chars())
    }
}

/// Rank every entry's basename against `query` and keep the best `limit`.
///
/// Returns nothing for queries of [`MIN_QUERY_CHARS`] characters or fewer.
/// Ties keep manifest order.
pub fn suggest<'a>(query: &str, entries: &'a [FileEntry], limit: usize) -> Vec<Suggestion<'a>> {
    let query = query.trim();
    if query.chars().count() <= MIN_QUERY_CHARS {
        return vec![];
    }

    let mut ranked: Vec<Suggestion<'a>> = entries
        .iter()
        .map(|entry| Suggestion {
            entry,
            score: score(query, entry.name()),
        })
        .collect();

    // stable
    ranked.sort_by_key(|s| s.score);
    ranked.truncate(limit);

    tracing::trace!(
        "Ranked {} suggestions for '{}' over {} entries",
        ranked.len(),
        query,
        entries.len()
    );

    ranked
}
