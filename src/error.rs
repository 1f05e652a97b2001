//! Error types for FlickFind
//!
//! Everything that can go wrong talking to the remote catalog funnels into
//! [`CatalogError`]. Controller and cache transitions never fail on their own;
//! they only carry these errors through.

use thiserror::Error;

/// Main error type for catalog operations
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request to the catalog failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("catalog returned a malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no API token configured (set TMDB_API_TOKEN or pass --token)")]
    MissingToken,
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Whether the remote service rejected our credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, CatalogError::Status { status: 401 | 403 })
    }
}
