//! Query cache and fetch orchestration
//!
//! Maps a [`QueryKey`] to fetch lifecycle state. The cache decides when a
//! fetch must actually be started, shares one outstanding fetch per key, and
//! keeps the previously displayed page visible while the next one is in
//! flight so the grid never flashes empty between pages.
//!
//! The cache is owned by the event loop and only mutated there; fetch results
//! re-enter through [`SearchCache::complete`].

use crate::catalog::SearchPage;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Identity of one logical fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub query: String,
    pub page: u32,
}

impl QueryKey {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

/// Coarse fetch state for the currently observed key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// A resolved page plus the generation of the fetch that produced it
///
/// Generations let the shell tell a *new* result apart from re-observing the
/// same one, which is what keys the zero-results notification.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub page: Arc<SearchPage>,
    pub generation: u64,
}

#[derive(Default)]
struct CacheEntry {
    data: Option<CachedPage>,
    in_flight: bool,
    failed: bool,
}

/// What one [`SearchCache::observe`] call tells the caller
pub struct Observation {
    /// Page to display: the current key's data, or the last page that was
    /// displayed while the current key is still pending or failed
    pub data: Option<CachedPage>,
    pub status: FetchStatus,
    /// The caller must start a fetch for this key now. Set at most once per
    /// outstanding fetch; the cache marks the key in flight immediately.
    pub needs_fetch: bool,
}

/// Key -> fetch lifecycle map with keep-previous-data display semantics
pub struct SearchCache {
    entries: HashMap<QueryKey, CacheEntry>,
    current: Option<QueryKey>,
    last_shown: Option<CachedPage>,
    next_generation: u64,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            current: None,
            last_shown: None,
            next_generation: 0,
        }
    }

    /// Report display state for `key` and decide whether a fetch is due.
    ///
    /// With `enabled == false` nothing is fetched and the status is Idle.
    /// A key change serves cached data immediately when present, but still
    /// requests a background refetch; an unchanged key only fetches when the
    /// entry holds nothing and did not just fail (no retry loops).
    pub fn observe(&mut self, key: &QueryKey, enabled: bool) -> Observation {
        if !enabled {
            self.current = None;
            return Observation {
                data: self.last_shown.clone(),
                status: FetchStatus::Idle,
                needs_fetch: false,
            };
        }

        let key_changed = self.current.as_ref() != Some(key);
        if key_changed {
            self.current = Some(key.clone());
        }

        let entry = self.entries.entry(key.clone()).or_default();

        let mut needs_fetch = false;
        if !entry.in_flight && (key_changed || (entry.data.is_none() && !entry.failed)) {
            entry.in_flight = true;
            entry.failed = false;
            needs_fetch = true;
        }

        let (data, status) = if let Some(own) = &entry.data {
            // Cached data for the current key is always shown, even while a
            // background refresh is in flight or after a refresh failed.
            let status = if entry.failed {
                FetchStatus::Error
            } else {
                FetchStatus::Success
            };
            (Some(own.clone()), status)
        } else if entry.in_flight {
            (self.last_shown.clone(), FetchStatus::Loading)
        } else {
            debug_assert!(entry.failed);
            (self.last_shown.clone(), FetchStatus::Error)
        };

        if entry.data.is_some() {
            self.last_shown = entry.data.clone();
        }

        Observation {
            data,
            status,
            needs_fetch,
        }
    }

    /// Record the outcome of a fetch started after [`Self::observe`]
    /// requested it.
    ///
    /// A success is cached under its key regardless of whether that key is
    /// still current, but only the current key's result becomes the displayed
    /// page (last-key-wins). A failure keeps whatever the entry already held.
    pub fn complete(&mut self, key: QueryKey, result: Result<SearchPage>) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.in_flight = false;

        match result {
            Ok(page) => {
                self.next_generation += 1;
                entry.data = Some(CachedPage {
                    page: Arc::new(page),
                    generation: self.next_generation,
                });
                entry.failed = false;
                if self.current.as_ref() == Some(&key) {
                    self.last_shown = entry.data.clone();
                }
            }
            Err(err) => {
                tracing::warn!(
                    query = %key.query,
                    page = key.page,
                    error = %err,
                    "search fetch failed"
                );
                entry.failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movie;
    use crate::error::CatalogError;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            title: format!("Movie {id}"),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            original_language: None,
            vote_average: 0.0,
            vote_count: 0,
        }
    }

    fn page_of(items: usize, page: u32, total_pages: u32) -> SearchPage {
        SearchPage {
            page,
            results: (0..items as u64).map(movie).collect(),
            total_pages,
            total_results: total_pages * items as u32,
        }
    }

    fn failure() -> crate::error::Result<SearchPage> {
        Err(CatalogError::Status { status: 500 })
    }

    #[test]
    fn disabled_observation_is_idle_and_fetchless() {
        let mut cache = SearchCache::new();
        let key = QueryKey::new("batman", 1);

        let obs = cache.observe(&key, false);

        assert_eq!(obs.status, FetchStatus::Idle);
        assert!(!obs.needs_fetch);
        assert!(obs.data.is_none());
    }

    #[test]
    fn one_outstanding_fetch_per_key() {
        let mut cache = SearchCache::new();
        let key = QueryKey::new("batman", 1);

        assert!(cache.observe(&key, true).needs_fetch);
        // Re-observing while in flight must not issue another fetch.
        assert!(!cache.observe(&key, true).needs_fetch);
        assert_eq!(cache.observe(&key, true).status, FetchStatus::Loading);
    }

    #[test]
    fn success_is_displayed_for_its_key() {
        let mut cache = SearchCache::new();
        let key = QueryKey::new("batman", 1);

        cache.observe(&key, true);
        cache.complete(key.clone(), Ok(page_of(12, 1, 3)));

        let obs = cache.observe(&key, true);
        assert_eq!(obs.status, FetchStatus::Success);
        assert_eq!(obs.data.unwrap().page.results.len(), 12);
        // Settled key, nothing new to fetch.
        assert!(!cache.observe(&key, true).needs_fetch);
    }

    #[test]
    fn page_change_keeps_previous_data_visible() {
        let mut cache = SearchCache::new();
        let page1 = QueryKey::new("batman", 1);
        let page2 = QueryKey::new("batman", 2);

        cache.observe(&page1, true);
        cache.complete(page1.clone(), Ok(page_of(20, 1, 3)));
        cache.observe(&page1, true);

        let obs = cache.observe(&page2, true);
        assert_eq!(obs.status, FetchStatus::Loading);
        assert!(obs.needs_fetch);
        // The 20 items from page 1 stay visible while page 2 loads.
        let stale = obs.data.expect("previous page should stay visible");
        assert_eq!(stale.page.page, 1);
        assert_eq!(stale.page.results.len(), 20);

        cache.complete(page2.clone(), Ok(page_of(16, 2, 3)));
        let obs = cache.observe(&page2, true);
        assert_eq!(obs.status, FetchStatus::Success);
        assert_eq!(obs.data.unwrap().page.page, 2);
    }

    #[test]
    fn failure_keeps_last_good_data() {
        let mut cache = SearchCache::new();
        let page1 = QueryKey::new("batman", 1);
        let page2 = QueryKey::new("batman", 2);

        cache.observe(&page1, true);
        cache.complete(page1.clone(), Ok(page_of(20, 1, 3)));
        cache.observe(&page1, true);

        cache.observe(&page2, true);
        cache.complete(page2.clone(), failure());

        let obs = cache.observe(&page2, true);
        assert_eq!(obs.status, FetchStatus::Error);
        assert_eq!(obs.data.unwrap().page.page, 1);
        // A failed key is not retried by re-observing it.
        assert!(!cache.observe(&page2, true).needs_fetch);
    }

    #[test]
    fn failure_with_no_history_has_no_data() {
        let mut cache = SearchCache::new();
        let key = QueryKey::new("zzzz", 1);

        cache.observe(&key, true);
        cache.complete(key.clone(), failure());

        let obs = cache.observe(&key, true);
        assert_eq!(obs.status, FetchStatus::Error);
        assert!(obs.data.is_none());
    }

    #[test]
    fn late_result_for_superseded_key_is_not_displayed() {
        let mut cache = SearchCache::new();
        let key_a = QueryKey::new("alien", 1);
        let key_b = QueryKey::new("blade", 1);

        cache.observe(&key_a, true);
        cache.observe(&key_b, true);

        // A resolves after B became current: cached, never displayed.
        cache.complete(key_a.clone(), Ok(page_of(9, 1, 1)));
        let obs = cache.observe(&key_b, true);
        assert_eq!(obs.status, FetchStatus::Loading);
        assert!(obs.data.is_none());

        cache.complete(key_b.clone(), Ok(page_of(4, 1, 1)));
        let obs = cache.observe(&key_b, true);
        assert_eq!(obs.status, FetchStatus::Success);
        assert_eq!(obs.data.unwrap().page.results.len(), 4);

        // A's late result is still in the cache for an instant revisit.
        let obs = cache.observe(&key_a, true);
        assert_eq!(obs.status, FetchStatus::Success);
        assert_eq!(obs.data.unwrap().page.results.len(), 9);
    }

    #[test]
    fn displayed_data_follows_latest_key() {
        let mut cache = SearchCache::new();
        let key_a = QueryKey::new("alien", 1);
        let key_b = QueryKey::new("blade", 1);

        cache.observe(&key_a, true);
        cache.complete(key_a.clone(), Ok(page_of(9, 1, 1)));
        cache.observe(&key_a, true);

        // While B is pending the old page stays visible.
        let obs = cache.observe(&key_b, true);
        assert_eq!(obs.status, FetchStatus::Loading);
        assert_eq!(obs.data.unwrap().page.results.len(), 9);

        cache.complete(key_b.clone(), Ok(page_of(4, 1, 1)));
        let obs = cache.observe(&key_b, true);
        assert_eq!(obs.data.unwrap().page.results.len(), 4);
    }

    #[test]
    fn revisiting_cached_key_serves_cache_and_refreshes() {
        let mut cache = SearchCache::new();
        let page1 = QueryKey::new("batman", 1);
        let page2 = QueryKey::new("batman", 2);

        cache.observe(&page1, true);
        cache.complete(page1.clone(), Ok(page_of(20, 1, 2)));
        cache.observe(&page2, true);
        cache.complete(page2.clone(), Ok(page_of(7, 2, 2)));

        // Back to page 1: cached data is shown at once, refreshed behind it.
        let obs = cache.observe(&page1, true);
        assert_eq!(obs.status, FetchStatus::Success);
        assert_eq!(obs.data.as_ref().unwrap().page.page, 1);
        assert!(obs.needs_fetch);

        let first_generation = obs.data.unwrap().generation;
        cache.complete(page1.clone(), Ok(page_of(20, 1, 2)));
        let refreshed = cache.observe(&page1, true).data.unwrap();
        assert!(refreshed.generation > first_generation);
    }

    #[test]
    fn generations_distinguish_repeat_results() {
        let mut cache = SearchCache::new();
        let key = QueryKey::new("zzzznomatch", 1);

        cache.observe(&key, true);
        cache.complete(key.clone(), Ok(page_of(0, 1, 0)));

        // The same empty result keeps its generation across observes, so the
        // shell can notify exactly once per response.
        let first = cache.observe(&key, true).data.unwrap().generation;
        let second = cache.observe(&key, true).data.unwrap().generation;
        assert_eq!(first, second);
    }
}
