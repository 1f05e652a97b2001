//! FlickFind - terminal movie search for the TMDB catalog
//!
//! A search box, a paginated results grid and a detail overlay, backed by a
//! thin HTTP client for the remote catalog's search endpoint.
//!
//! # Features
//!
//! - **Interactive TUI**: type-to-search with a live results grid
//! - **Paginated results**: windowed page strip bound to the catalog's paging
//! - **Keep-previous-data**: the grid never flashes empty between pages
//! - **One-shot CLI**: `flickfind search <query>` prints a page and exits
//!
//! # Example
//!
//! ```no_run
//! use flickfind::{CatalogClient, Config};
//!
//! fn main() -> flickfind::Result<()> {
//!     let config = Config::new("bearer-token".to_string());
//!     let client = CatalogClient::new(&config)?;
//!
//!     let page = client.search("batman", 1)?;
//!
//!     println!("{} results over {} pages", page.total_results, page.total_pages);
//!     for movie in &page.results {
//!         println!("{} ({})", movie.title, movie.year().unwrap_or(0));
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

pub mod cache;
pub mod catalog;
pub mod controller;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod tui;

// Re-export main types
pub use cache::{CachedPage, FetchStatus, Observation, QueryKey, SearchCache};
pub use catalog::{CatalogClient, Movie, SearchPage};
pub use controller::SearchController;
pub use error::{CatalogError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Search endpoint base of the public TMDB API
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Extract the year from a catalog release date such as `2008-07-16`
pub fn release_year(date: &str) -> Option<i32> {
    use chrono::{Datelike, NaiveDate};
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Format a result count with thousands separators
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Client configuration
///
/// The bearer credential is injected here rather than read from ambient
/// process state, so the client stays testable with fake credentials.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token presented to the catalog
    pub token: String,
    /// Base URL of the catalog API
    pub base_url: String,
    /// Transport-level timeout for one request
    pub timeout: Duration,
}

impl Config {
    pub fn new(token: String) -> Self {
        Self {
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_parses_full_dates() {
        assert_eq!(release_year("2008-07-16"), Some(2008));
        assert_eq!(release_year("1999-01-01"), Some(1999));
    }

    #[test]
    fn release_year_rejects_partial_dates() {
        assert_eq!(release_year(""), None);
        assert_eq!(release_year("2008"), None);
        assert_eq!(release_year("not-a-date"), None);
    }

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(36), "36");
        assert_eq!(format_count(1420), "1,420");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
