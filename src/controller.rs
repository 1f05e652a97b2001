//! Search state and its transitions
//!
//! Owns the active query text, the page number and the selected movie. All
//! transitions are total; invalid page targets are ignored rather than
//! rejected, because the pagination bar only offers pages that exist.

use crate::cache::QueryKey;
use crate::catalog::Movie;

/// Current query, page and selection
///
/// An empty query means "no active search": fetching is disabled and the
/// shell renders its idle hint instead of results.
#[derive(Debug)]
pub struct SearchController {
    query: String,
    page: u32,
    selected: Option<Movie>,
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            page: 1,
            selected: None,
        }
    }

    /// Submit a new search.
    ///
    /// The text is trimmed; the page resets to 1 and any open selection is
    /// closed, even when the trimmed text equals the previous query.
    pub fn submit(&mut self, text: &str) {
        self.query = text.trim().to_string();
        self.page = 1;
        self.selected = None;
        tracing::debug!(query = %self.query, "search submitted");
    }

    /// Move to page `n`, bounded by the page count of the displayed result.
    ///
    /// Keeps the selection open; only a new search closes it.
    pub fn change_page(&mut self, n: u32, total_pages: u32) {
        if self.query.is_empty() {
            return;
        }
        if n >= 1 && n <= total_pages {
            self.page = n;
        }
    }

    pub fn select(&mut self, movie: Movie) {
        self.selected = Some(movie);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.selected.as_ref()
    }

    /// Fetching is attempted only while a non-empty query is active
    pub fn fetch_enabled(&self) -> bool {
        !self.query.is_empty()
    }

    /// Cache key for the current (query, page) pair
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.query.clone(), self.page)
    }
}
