//! End-to-end flow of the search state machine and the query cache, driven
//! without a terminal or network: fetch completions are delivered by hand in
//! the order under test.

use flickfind::{CatalogError, FetchStatus, Movie, SearchCache, SearchController, SearchPage};

fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        original_language: None,
        vote_average: 0.0,
        vote_count: 0,
    }
}

fn page_of(items: usize, page: u32, total_pages: u32, total_results: u32) -> SearchPage {
    SearchPage {
        page,
        results: (0..items as u64)
            .map(|i| movie(i, &format!("Movie {i}")))
            .collect(),
        total_pages,
        total_results,
    }
}

#[test]
fn batman_happy_path() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("batman");
    assert!(ctl.fetch_enabled());

    let obs = cache.observe(&ctl.key(), ctl.fetch_enabled());
    assert!(obs.needs_fetch);
    assert_eq!(obs.status, FetchStatus::Loading);

    cache.complete(ctl.key(), Ok(page_of(12, 1, 3, 36)));

    let obs = cache.observe(&ctl.key(), ctl.fetch_enabled());
    assert_eq!(obs.status, FetchStatus::Success);
    let shown = obs.data.expect("results should be displayed");
    assert_eq!(shown.page.results.len(), 12);
    // More than one page exists, so the pagination strip is offered.
    assert_eq!(shown.page.total_pages, 3);
    assert_eq!(shown.page.total_results, 36);
}

#[test]
fn empty_submission_disables_fetching() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("   ");

    assert_eq!(ctl.page(), 1);
    assert!(ctl.selected().is_none());
    assert!(!ctl.fetch_enabled());

    let obs = cache.observe(&ctl.key(), ctl.fetch_enabled());
    assert_eq!(obs.status, FetchStatus::Idle);
    assert!(!obs.needs_fetch);
}

#[test]
fn zero_results_keep_one_generation_per_response() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("zzzznomatch");
    cache.observe(&ctl.key(), true);
    cache.complete(ctl.key(), Ok(page_of(0, 1, 0, 0)));

    let first = cache.observe(&ctl.key(), true);
    assert_eq!(first.status, FetchStatus::Success);
    let first = first.data.expect("empty page is still a result");
    assert!(first.page.results.is_empty());

    // Re-observing the same response keeps its generation, which is what
    // limits the "No movies found" notification to once per response.
    let second = cache.observe(&ctl.key(), true).data.unwrap();
    assert_eq!(first.generation, second.generation);
}

#[test]
fn previous_page_stays_visible_while_next_loads() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("batman");
    cache.observe(&ctl.key(), true);
    cache.complete(ctl.key(), Ok(page_of(20, 1, 3, 60)));
    cache.observe(&ctl.key(), true);

    ctl.change_page(2, 3);
    let obs = cache.observe(&ctl.key(), true);

    assert_eq!(obs.status, FetchStatus::Loading);
    assert!(obs.needs_fetch);
    let stale = obs.data.expect("page 1 should stay on screen");
    assert_eq!(stale.page.page, 1);
    assert_eq!(stale.page.results.len(), 20);
}

#[test]
fn rapid_page_flips_commit_only_the_current_key() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("batman");
    let key_page1 = ctl.key();
    assert!(cache.observe(&key_page1, true).needs_fetch);

    // An earlier response already told us there are 3 pages.
    ctl.change_page(2, 3);
    let key_page2 = ctl.key();
    assert!(cache.observe(&key_page2, true).needs_fetch);

    ctl.change_page(1, 3);
    // Page 1 is still in flight; flipping back must not issue another fetch.
    assert!(!cache.observe(&key_page1, true).needs_fetch);

    // Page 2 resolves while page 1 is current: cached, not displayed.
    cache.complete(key_page2, Ok(page_of(16, 2, 3, 60)));
    let obs = cache.observe(&key_page1, true);
    assert_eq!(obs.status, FetchStatus::Loading);
    assert!(obs.data.is_none());

    cache.complete(key_page1.clone(), Ok(page_of(12, 1, 3, 60)));
    let obs = cache.observe(&key_page1, true);
    assert_eq!(obs.status, FetchStatus::Success);
    assert_eq!(obs.data.unwrap().page.page, 1);
}

#[test]
fn new_search_clears_selection_but_page_change_keeps_it() {
    let mut ctl = SearchController::new();

    ctl.submit("batman");
    ctl.select(movie(155, "The Dark Knight"));

    ctl.change_page(2, 3);
    assert_eq!(ctl.selected().map(|m| m.id), Some(155));

    ctl.submit("alien");
    assert!(ctl.selected().is_none());
    assert_eq!(ctl.page(), 1);
}

#[test]
fn fetch_failure_keeps_last_good_page_visible() {
    let mut ctl = SearchController::new();
    let mut cache = SearchCache::new();

    ctl.submit("batman");
    cache.observe(&ctl.key(), true);
    cache.complete(ctl.key(), Ok(page_of(20, 1, 3, 60)));
    cache.observe(&ctl.key(), true);

    ctl.change_page(2, 3);
    cache.observe(&ctl.key(), true);
    cache.complete(ctl.key(), Err(CatalogError::Status { status: 503 }));

    let obs = cache.observe(&ctl.key(), true);
    assert_eq!(obs.status, FetchStatus::Error);
    assert_eq!(obs.data.unwrap().page.page, 1);
}
