//! Page fetching.
//!
//! The orchestrator only sees the `PageFetcher` trait; `HttpFetcher` is the
//! plain-HTTP implementation used by the CLI.

use super::config::FetchConfig;
use super::error::FetchError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use url::Url;

/// Raw page returned by a fetcher
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Response body
    pub html: String,
    /// Response metadata such as content type and headers of interest
    pub metadata: BTreeMap<String, String>,
}

/// Source of raw HTML for a URL. Timeouts and transport policy belong to
/// the implementation; callers never retry.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Headers copied into `FetchedPage::metadata`
const KEPT_HEADERS: &[&str] = &["content-type", "content-language", "last-modified", "etag"];

/// `PageFetcher` over reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

fn is_html_like(content_type: &str) -> bool {
    ["text/html", "application/xhtml", "text/plain"]
        .iter()
        .any(|kind| content_type.contains(kind))
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().clone();
        let metadata: BTreeMap<String, String> = KEPT_HEADERS
            .iter()
            .filter_map(|name| {
                let value = response.headers().get(*name)?.to_str().ok()?;
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        let content_type = metadata
            .get("content-type")
            .map(String::as_str)
            .unwrap_or("text/html");
        if !is_html_like(content_type) {
            return Err(FetchError::InvalidContentType(content_type.to_string()));
        }

        let html = response.text().await?;
        debug!(status = status.as_u16(), bytes = html.len(), "Fetched page");

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            html,
            metadata,
        })
    }
}
