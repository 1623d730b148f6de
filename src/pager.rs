//! Incremental paging over the filtered result list.

/// Entries appended per "load more".
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// Distance from the end of the rendered output at which a scrolling front end
/// requests the next page.
pub const SCROLL_THRESHOLD: usize = 200;

/// A zero-based page cursor.
///
/// The pager does not own the results; callers pass the current list on every
/// call and must [`reset`](Pager::reset) whenever that list is replaced.
#[derive(Debug, Clone)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Pager {
    /// Create a pager. A zero page size is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Pages handed out since the last reset.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of items handed out since the last reset.
    pub fn rendered(&self, len: usize) -> usize {
        (self.page * self.page_size).min(len)
    }

    pub fn has_more(&self, len: usize) -> bool {
        self.rendered(len) < len
    }

    /// Return the next slice of `items` and advance the cursor.
    ///
    /// Once everything has been handed out this returns an empty slice and the
    /// cursor stays put.
    pub fn next_page<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        let start = self.rendered(items.len());
        let end = (start + self.page_size).min(items.len());
        if start < end {
            self.page += 1;
        }
        tracing::debug!("Page {} covers items {}..{} of {}", self.page, start, end, items.len());
        &items[start..end]
    }

    /// Back to the first page, as if nothing had been rendered.
    pub fn reset(&mut self) {
        self.page = 0;
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Whether a scroll position is close enough to the end to load the next page.
///
/// For front ends that page on scroll. The line-based REPL pages on `:more` and
/// does not call this.
///
/// All arguments share one unit (pixels, rows): `offset` is the scrolled distance,
/// `viewport` the visible height and `content` the full rendered height.
pub fn near_end(offset: usize, viewport: usize, content: usize, threshold: usize) -> bool {
    offset + viewport + threshold >= content
}
