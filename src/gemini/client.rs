//! Client entry point for the Gemini API

use crate::error::Result;
use crate::gemini::http::{HttpClient, HttpOptions};
use crate::gemini::models::ModelsService;

/// Client for the Gemini Developer API
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, HttpOptions::default())
    }

    /// Create a new client with an API key and custom HTTP options
    pub fn with_options(api_key: impl Into<String>, options: HttpOptions) -> Result<Self> {
        Ok(Self {
            http_client: HttpClient::with_api_key_and_options(api_key.into(), options)?,
        })
    }

    /// Create a client that retries rate-limited requests with backoff
    pub fn with_api_key_rate_limited(api_key: impl Into<String>) -> Result<Self> {
        let options = HttpOptions {
            retry_on_rate_limit: true,
            max_retries: 5,
            ..HttpOptions::default()
        };
        Self::with_options(api_key, options)
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }

    #[cfg(test)]
    pub(crate) fn set_base_url(&mut self, url: String) {
        self.http_client.set_base_url(url);
    }
}
