//! HTTP client for the remote movie catalog
//!
//! One outbound GET per [`CatalogClient::search`] call, bearer credential in
//! the request header, typed JSON page back. No retries and no caching here;
//! both belong to the query cache.

use crate::error::{CatalogError, Result};
use crate::Config;
use serde::{Deserialize, Serialize};

/// One movie record as the catalog returns it
///
/// The shape is owned by the remote service; optional fields tolerate both
/// `null` and absent keys, and unknown keys are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
}

impl Movie {
    /// Release year, when the catalog provided a full date
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(crate::release_year)
    }

    /// Public web page for this movie on the catalog site
    pub fn catalog_url(&self) -> String {
        format!("https://www.themoviedb.org/movie/{}", self.id)
    }

    /// Full URL for the poster image, if the catalog has one
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| format!("https://image.tmdb.org/t/p/w500{p}"))
    }
}

/// One page of search results
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchPage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Thin client for the catalog search endpoint
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::blocking::Client,
    token: String,
    base_url: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            token: config.token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of results for `query`
    ///
    /// Fails on transport errors, non-2xx responses and malformed payloads.
    /// An invalid credential is not detected locally; it comes back from the
    /// remote service as an authorization status.
    pub fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        tracing::debug!(query, page, "requesting search page");

        let page_param = page.to_string();
        let response = self
            .http
            .get(format!("{}/search/movie", self.base_url))
            .query(&[("query", query), ("page", page_param.as_str())])
            .bearer_auth(&self.token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(query, page, status = status.as_u16(), "search rejected");
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let result: SearchPage = serde_json::from_str(&body)?;

        tracing::debug!(
            query,
            page = result.page,
            hits = result.results.len(),
            total = result.total_results,
            "search page received"
        );
        Ok(result)
    }
}
