//! Browsing session: the loaded entries, the active query and paging state.
//!
//! A [`Session`] is owned by a single controller. Every query change re-runs the
//! filter and resets the pager; every reload replaces the entry list wholesale.

use crate::config::Config;
use crate::error::FetchError;
use crate::manifest::ManifestClient;
use crate::pager::Pager;
use crate::search::{Highlighted, Query, Suggestion, highlight, suggest};
use crate::types::{FileEntry, ManifestKind};
use std::ops::Range;

/// Identifies one reload so a late response can be told apart from the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadTicket {
    generation: u64,
    kind: ManifestKind,
    name: String,
}

impl ReloadTicket {
    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    /// The manifest file name being loaded.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub struct Session {
    entries: Vec<FileEntry>,
    query: String,
    /// Indices into `entries`, in manifest order.
    matched: Vec<usize>,
    pager: Pager,
    suggestion_limit: usize,
    /// Inline message for the user, set when a load fails.
    status: Option<String>,
    generation: u64,
    loaded: Option<ManifestKind>,
}

impl Session {
    pub fn new(page_size: usize, suggestion_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            query: String::new(),
            matched: Vec::new(),
            pager: Pager::new(page_size),
            suggestion_limit,
            status: None,
            generation: 0,
            loaded: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.page_size, config.suggestion_limit)
    }

    /// Start with an already loaded entry list.
    pub fn with_entries(mut self, entries: Vec<FileEntry>) -> Self {
        self.entries = entries;
        self.refilter();
        self
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Which manifest the current entries came from, if any load succeeded.
    pub fn loaded(&self) -> Option<ManifestKind> {
        self.loaded
    }

    /// Entries matching the active query, in manifest order.
    pub fn results(&self) -> Vec<&FileEntry> {
        self.matched.iter().map(|&i| &self.entries[i]).collect()
    }

    pub fn result_count(&self) -> usize {
        self.matched.len()
    }

    /// "Did you mean" candidates for the active query.
    ///
    /// Independent of the filtered results: offered even when nothing matched.
    pub fn suggestions(&self) -> Vec<Suggestion<'_>> {
        suggest(&self.query, &self.entries, self.suggestion_limit)
    }

    /// The entry's basename with the active query's terms marked.
    pub fn highlight(&self, entry: &FileEntry) -> Highlighted {
        highlight(&self.query, entry.name())
    }

    /// Replace the query, re-run the filter and go back to the first page.
    pub fn set_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.refilter();
    }

    /// Replace the query with the basename of suggestion `index` and re-filter.
    ///
    /// Returns the new query, or `None` if there is no such suggestion.
    pub fn apply_suggestion(&mut self, index: usize) -> Option<String> {
        let name = self.suggestions().get(index)?.entry.name().to_string();
        self.set_query(&name);
        Some(name)
    }

    /// Hand out the next page of results.
    ///
    /// Returns the positions within [`results`](Self::results) that were added; the
    /// range is empty once everything has been handed out. Use [`page`](Self::page)
    /// to resolve it.
    pub fn load_more(&mut self) -> Range<usize> {
        let start = self.rendered();
        let len = self.pager.next_page(&self.matched).len();
        start..start + len
    }

    /// The results at `range`, as returned by [`load_more`](Self::load_more).
    pub fn page(&self, range: Range<usize>) -> Vec<&FileEntry> {
        self.matched
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.entries[i])
            .collect()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.matched.len())
    }

    /// Number of results handed out by [`load_more`](Self::load_more) so far.
    pub fn rendered(&self) -> usize {
        self.pager.rendered(self.matched.len())
    }

    /// Fetch `kind` through `client` and apply the outcome.
    pub async fn reload(&mut self, client: &ManifestClient, kind: ManifestKind) -> bool {
        let ticket = self.begin_reload(kind, client.manifest_name(kind));
        let outcome = client.load(kind).await;
        self.finish_reload(ticket, outcome)
    }

    /// Register a new reload. Any ticket issued earlier becomes stale.
    pub fn begin_reload(&mut self, kind: ManifestKind, name: &str) -> ReloadTicket {
        self.generation += 1;
        ReloadTicket {
            generation: self.generation,
            kind,
            name: name.to_string(),
        }
    }

    /// Apply the outcome of a reload.
    ///
    /// Outcomes for stale tickets are dropped and `false` is returned. A failed load
    /// empties the entry list and sets the status message; it is not retried.
    pub fn finish_reload(
        &mut self,
        ticket: ReloadTicket,
        outcome: Result<Vec<FileEntry>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale response for {} (generation {}, latest {})",
                ticket.name,
                ticket.generation,
                self.generation
            );
            return false;
        }

        match outcome {
            Ok(entries) => {
                tracing::debug!("Replacing {} entries with {}", self.entries.len(), entries.len());
                self.entries = entries;
                self.status = None;
                self.loaded = Some(ticket.kind);
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", ticket.name, e);
                self.entries.clear();
                self.status = Some(format!(
                    "Failed to load {}. Ensure the file exists.",
                    ticket.name
                ));
                self.loaded = None;
            }
        }

        self.refilter();
        true
    }

    fn refilter(&mut self) {
        let query = Query::parse(&self.query);
        self.matched = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| query.matches(entry.name()))
            .map(|(i, _)| i)
            .collect();
        self.pager.reset();

        tracing::debug!(
            "Query '{}' matched {} of {} entries",
            self.query,
            self.matched.len(),
            self.entries.len()
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn manifest() -> Vec<FileEntry> {
        vec![
            FileEntry::new("docs/report.pdf", false),
            FileEntry::new("docs/report_final.pdf", true),
            FileEntry::new("img/image.png", false),
        ]
    }

    fn not_found() -> FetchError {
        FetchError::NotAnArray {
            name: "files.json".to_string(),
        }
    }

    fn names(entries: &[&FileEntry]) -> Vec<String> {
        entries.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_empty_query_shows_everything() {
        let session = Session::default().with_entries(manifest());
        check!(session.result_count() == 3);
    }

    #[test]
    fn test_report_scenario() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("report");

        let results = session.results();
        check!(names(&results) == vec!["report.pdf", "report_final.pdf"]);
        for entry in results {
            check!(session.highlight(entry).render("<", ">").contains("<report>"));
        }
    }

    #[test]
    fn test_phrase_scenario() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("\"final report\"");
        check!(session.result_count() == 0);
    }

    #[test]
    fn test_negation_scenario() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("pdf -final");
        check!(names(&session.results()) == vec!["report.pdf"]);
    }

    #[test]
    fn test_no_match_still_suggests() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("xyz123");

        check!(session.result_count() == 0);
        let suggestions = session.suggestions();
        check!(!suggestions.is_empty());
        check!(suggestions.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_apply_suggestion_replaces_query() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("imagee.png");

        let applied = session.apply_suggestion(0);
        check!(applied.as_deref() == Some("image.png"));
        check!(session.query() == "image.png");
        check!(names(&session.results()) == vec!["image.png"]);
        check!(session.apply_suggestion(99).is_none());
    }

    #[test]
    fn test_query_change_resets_pager() {
        let entries = (0..100)
            .map(|i| FileEntry::new(format!("file{i:03}.txt"), false))
            .collect();
        let mut session = Session::new(40, 5).with_entries(entries);

        check!(session.load_more().len() == 40);
        check!(session.load_more().len() == 40);
        check!(session.rendered() == 80);

        session.set_query("file0");
        check!(session.rendered() == 0);
        check!(session.load_more().len() == 40);
        check!(session.load_more().len() == 40);
        check!(session.load_more().len() == 20);
        check!(!session.has_more());
        check!(session.load_more().is_empty());
    }

    #[test]
    fn test_failed_reload_clears_entries() {
        let mut session = Session::default().with_entries(manifest());
        session.set_query("report");

        let ticket = session.begin_reload(ManifestKind::All, "files.json");
        check!(session.finish_reload(ticket, Err(not_found())));

        check!(session.entries().is_empty());
        check!(session.result_count() == 0);
        check!(session.loaded().is_none());
        let_assert!(Some(status) = session.status());
        check!(status == "Failed to load files.json. Ensure the file exists.");
    }

    #[test]
    fn test_successful_reload_keeps_query_and_clears_status() {
        let mut session = Session::default();
        let ticket = session.begin_reload(ManifestKind::All, "files.json");
        session.finish_reload(ticket, Err(not_found()));
        session.set_query("image");

        let ticket = session.begin_reload(ManifestKind::New, "new.json");
        check!(session.finish_reload(ticket, Ok(manifest())));

        check!(session.status().is_none());
        check!(session.loaded() == Some(ManifestKind::New));
        check!(names(&session.results()) == vec!["image.png"]);
    }

    #[test]
    fn test_stale_reload_is_discarded() {
        let mut session = Session::default();
        let slow = session.begin_reload(ManifestKind::All, "files.json");
        let fast = session.begin_reload(ManifestKind::New, "new.json");

        check!(session.finish_reload(fast, Ok(vec![FileEntry::new("new.pdf", true)])));
        check!(!session.finish_reload(slow, Ok(manifest())));

        check!(session.entries().len() == 1);
        check!(session.loaded() == Some(ManifestKind::New));
    }

    #[test]
    fn test_reload_resets_pager() {
        let mut session = Session::new(2, 5).with_entries(manifest());
        session.load_more();
        check!(session.rendered() == 2);

        let ticket = session.begin_reload(ManifestKind::All, "files.json");
        session.finish_reload(ticket, Ok(manifest()));
        check!(session.rendered() == 0);
    }
}
