//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Run-level error for a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The seed is not an absolute http(s) URL
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    /// The seed page could not be fetched, so nothing was crawled
    #[error("Failed to fetch seed {url}: {source}")]
    SeedFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Writing the results file failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Failure to fetch a single page. Recorded on the page, never fatal for
/// the run unless it is the seed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response is not HTML
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Request exceeded the configured timeout
    #[error("Timed out fetching {0}")]
    Timeout(String),
}

/// Error writing crawl results
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL for storage: {0}")]
    InvalidUrl(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Storage(e) => e.into(),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}

impl From<FetchError> for CrateError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http(e) => CrateError::Http(e),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}

impl From<StorageError> for CrateError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Json(e) => CrateError::Json(e),
            _ => CrateError::Storage(err.to_string()),
        }
    }
}
