//! HTTP client for the Gemini API
//!
//! Handles API-key authentication, JSON request/response encoding and the
//! mapping of HTTP failures onto crate errors. Requests answered with HTTP 429
//! can be retried with exponential backoff.

use crate::error::{Error, Result};
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Upper bound for a single backoff delay in seconds
const MAX_BACKOFF_SECS: u64 = 60;

/// Options controlling request behaviour
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// API version segment of the URL
    pub api_version: String,

    /// Whether to retry requests answered with HTTP 429
    pub retry_on_rate_limit: bool,

    /// Maximum number of retries for rate-limited requests
    pub max_retries: u32,

    /// Delay used when no Retry-After header is present
    pub default_retry_after_secs: u64,

    /// Request timeout
    pub timeout_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            api_version: "v1beta".to_string(),
            retry_on_rate_limit: false,
            max_retries: 3,
            default_retry_after_secs: 2,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// HTTP client for making requests to the Gemini API
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API key sent as the `key` query parameter
    api_key: String,

    options: HttpOptions,
}

#[cfg(test)]
impl HttpClient {
    /// Set the base URL (for testing only)
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url;
    }
}

impl HttpClient {
    /// Create a new HTTP client with an API key and custom options
    pub fn with_api_key_and_options(api_key: String, options: HttpOptions) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
            options,
        })
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.options.api_version, path);
        Url::parse(&url).map_err(|e| Error::Other(format!("Invalid URL: {}", e)))
    }

    /// Send a POST request with a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let request = self
            .client
            .post(self.build_url(path)?)
            .query(&[("key", &self.api_key)])
            .json(body);

        debug!("Sending POST request to {}", path);
        self.execute_request(request).await
    }

    /// Backoff before retry `attempt` (1-based), doubling from `retry_after`
    fn backoff(&self, retry_after: u64, attempt: u32) -> Duration {
        let secs = retry_after
            .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
            .min(MAX_BACKOFF_SECS);
        Duration::from_secs(secs)
    }

    /// Send the request, retrying on 429 when enabled, and decode the body
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let mut attempt = 0;

        loop {
            let response = request
                .try_clone()
                .ok_or_else(|| Error::Other("Request body cannot be retried".to_string()))?
                .send()
                .await?;
            let status = response.status();
            let retry_after = retry_after_secs(&response).unwrap_or(self.options.default_retry_after_secs);
            let body = response.text().await?;

            if status.is_success() {
                return serde_json::from_str(&body).map_err(|e| {
                    error!("Undecodable Gemini response: {}", e);
                    Error::UnexpectedResponse(e.to_string())
                });
            }

            error!(status = status.as_u16(), "Gemini request failed: {}", body);

            if status != StatusCode::TOO_MANY_REQUESTS {
                return Err(status_error(status, body));
            }

            attempt += 1;
            if !self.options.retry_on_rate_limit || attempt > self.options.max_retries {
                return Err(Error::RateLimit {
                    retry_after_secs: retry_after,
                });
            }

            let delay = self.backoff(retry_after, attempt);
            debug!(
                "Rate limited, retry {}/{} in {:?}",
                attempt, self.options.max_retries, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Seconds from a numeric `Retry-After` header
fn retry_after_secs(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

fn status_error(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("Gemini rejected the API key ({})", status.as_u16()))
        }
        _ => Error::Api {
            status_code: status.as_u16(),
            message: body,
        },
    }
}
