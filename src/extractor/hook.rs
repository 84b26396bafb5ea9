//! Optional text-generation hook applied to extracted content

use crate::error::Error as CrateError;
use crate::gemini::Client;
use crate::gemini::prelude::Content;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug_span, info_span, instrument};

/// Characters of page content sent along with the instruction
const MAX_PROMPT_CONTENT_CHARS: usize = 3000;

/// Default Gemini model for the hook
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variables checked for the API key, in order
const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

/// Error type for the text-generation hook
#[derive(Debug, Error)]
pub enum HookError {
    /// No API key in the environment
    #[error("no API key found (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// The text-generation call failed
    #[error("text generation failed: {0}")]
    Generation(#[from] CrateError),

    /// The model answered without any text
    #[error("text generation returned no text")]
    EmptyResponse,
}

impl From<HookError> for CrateError {
    fn from(err: HookError) -> Self {
        CrateError::Hook(err.to_string())
    }
}

/// Rewrites page text according to a natural-language instruction
#[async_trait]
pub trait TextTransformer: Send + Sync {
    async fn transform(&self, url: &str, text: &str, instruction: &str)
    -> Result<String, HookError>;
}

/// Prompt sent to the model for one page
pub(crate) fn build_prompt(url: &str, text: &str, instruction: &str) -> String {
    let excerpt: String = text.chars().take(MAX_PROMPT_CONTENT_CHARS).collect();
    format!(
        "You are a content extraction specialist. I have scraped content from a webpage \
         and need you to process it according to specific instructions.\n\n\
         URL: {url}\n\
         Original Content: {excerpt}...\n\n\
         User Instructions: {instruction}\n\n\
         Please extract and structure the content according to the user's instructions. \
         Return the result as clean, readable text focusing on the requested information.\n\n\
         If the instructions ask for specific data points, structure them clearly.\n\
         If no specific format is requested, clean and organize the content for better readability."
    )
}

/// `TextTransformer` backed by Gemini `generateContent`, rate limited
#[derive(Clone)]
pub struct GeminiTransformer {
    client: Client,
    model: String,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl GeminiTransformer {
    pub fn new(client: Client, model: impl Into<String>, requests_per_minute: NonZeroU32) -> Self {
        Self {
            client,
            model: model.into(),
            limiter: Arc::new(RateLimiter::direct(Quota::per_minute(requests_per_minute))),
        }
    }

    /// Build from the API key in the environment
    pub fn from_env(
        model: impl Into<String>,
        requests_per_minute: NonZeroU32,
    ) -> Result<Self, HookError> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|key| !key.is_empty()))
            .ok_or(HookError::MissingApiKey)?;
        let client = Client::with_api_key_rate_limited(api_key)?;
        Ok(Self::new(client, model, requests_per_minute))
    }
}

#[async_trait]
impl TextTransformer for GeminiTransformer {
    #[instrument(skip(self, text, instruction), fields(model = %self.model))]
    async fn transform(
        &self,
        url: &str,
        text: &str,
        instruction: &str,
    ) -> Result<String, HookError> {
        self.limiter
            .until_ready()
            .instrument(debug_span!("limiter"))
            .await;

        let prompt = build_prompt(url, text, instruction);
        let response = self
            .client
            .models()
            .generate_content(
                &self.model,
                None,
                vec![Content::new().with_role("user").with_text(prompt)],
            )
            .instrument(info_span!("generate_content"))
            .await?;

        let output = response.text();
        if output.trim().is_empty() {
            return Err(HookError::EmptyResponse);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn transformer(server: &Server) -> GeminiTransformer {
        let mut client = Client::with_api_key("test-key").unwrap();
        client.set_base_url(server.url());
        GeminiTransformer::new(client, DEFAULT_MODEL, NonZeroU32::new(30).unwrap())
    }

    #[test]
    fn test_prompt_truncates_content() {
        let text = "a".repeat(5000);
        let prompt = build_prompt("https://example.com", &text, "List the prices");
        assert!(prompt.contains("URL: https://example.com"));
        assert!(prompt.contains("User Instructions: List the prices"));
        assert!(prompt.contains(&format!("Original Content: {}...", "a".repeat(3000))));
        assert!(!prompt.contains(&"a".repeat(3001)));
    }

    #[tokio::test]
    async fn test_gemini_transform() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("List the prices".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Basic: $10"}]}}]}"#)
            .create_async()
            .await;

        let output = transformer(&server)
            .transform("https://example.com", "Pricing page", "List the prices")
            .await
            .unwrap();
        assert_eq!(output, "Basic: $10");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_gemini_failures_are_hook_errors() {
        let mut server = Server::new_async().await;
        let _fail = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = transformer(&server)
            .transform("https://example.com", "text", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Generation(_)));
    }

    #[tokio::test]
    async fn test_empty_answer_is_an_error() {
        let mut server = Server::new_async().await;
        let _empty = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = transformer(&server)
            .transform("https://example.com", "text", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::EmptyResponse));
    }
}
