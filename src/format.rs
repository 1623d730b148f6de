//! Plain-text and JSON rendering of session state.

use crate::config::Config;
use crate::links::ArtifactLinks;
use crate::manifest::Source;
use crate::search::{Highlighted, Suggestion};
use crate::session::Session;
use crate::types::FileEntry;
use serde::Serialize;
use std::fmt::Write as _;

/// One rendered result card.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView<'a> {
    pub path: &'a str,
    pub name: &'a str,
    pub is_new: bool,
    pub highlight: Highlighted,
    pub links: ArtifactLinks,
}

impl<'a> EntryView<'a> {
    pub fn new(session: &Session, entry: &'a FileEntry, source: &Source, prefix: &str) -> Self {
        Self {
            path: &entry.path,
            name: entry.name(),
            is_new: entry.is_new,
            highlight: session.highlight(entry),
            links: ArtifactLinks::new(source, prefix, &entry.path),
        }
    }
}

/// Everything a front end needs to draw one page of results.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub query: &'a str,
    pub total: usize,
    pub shown: usize,
    pub has_more: bool,
    pub status: Option<&'a str>,
    pub entries: Vec<EntryView<'a>>,
    pub suggestions: Vec<Suggestion<'a>>,
}

impl<'a> PageView<'a> {
    pub fn new(session: &'a Session, page: &[&'a FileEntry], source: &Source, prefix: &str) -> Self {
        Self {
            query: session.query(),
            total: session.result_count(),
            shown: session.rendered(),
            has_more: session.has_more(),
            status: session.status(),
            entries: page
                .iter()
                .map(|&entry| EntryView::new(session, entry, source, prefix))
                .collect(),
            suggestions: session.suggestions(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering with the configured highlight markers.
    pub fn to_text(&self, config: &Config) -> String {
        let mut out = String::new();

        if let Some(status) = self.status {
            let _ = writeln!(out, "{}", status);
        } else if self.total == 0 {
            let _ = writeln!(out, "No files match '{}'.", self.query);
        }

        for entry in &self.entries {
            let marker = if entry.is_new { "* " } else { "  " };
            let _ = writeln!(
                out,
                "{}{}",
                marker,
                entry
                    .highlight
                    .render(&config.highlight_open, &config.highlight_close)
            );
            if entry.path != entry.name {
                let _ = writeln!(out, "    {}", entry.path);
            }
            let _ = writeln!(out, "    open: {}", entry.links.open);
        }

        if self.total > 0 {
            let _ = writeln!(
                out,
                "\nShowing {} of {}{}",
                self.shown,
                self.total,
                if self.has_more { " (:more for next page)" } else { "" }
            );
        }

        out.push_str(&format_suggestions(&self.suggestions));
        out
    }
}

/// Numbered "did you mean" list, or nothing when there are no suggestions.
pub fn format_suggestions(suggestions: &[Suggestion<'_>]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }

    let mut out = String::from("\nDid you mean:\n");
    for (idx, suggestion) in suggestions.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} (distance {})",
            idx + 1,
            suggestion.entry.name(),
            suggestion.score
        );
    }
    out
}
