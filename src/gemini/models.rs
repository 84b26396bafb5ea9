//! Models service for the Gemini API

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::types::{Content, GenerateContentResponse};
use serde::Serialize;
use tracing::{debug, instrument};

/// Body of a `generateContent` call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

/// `models/*` endpoints
#[derive(Clone)]
pub struct ModelsService {
    http_client: HttpClient,
}

impl ModelsService {
    pub(crate) fn new(http_client: HttpClient) -> Self {
        Self { http_client }
    }

    /// Single-turn generation with the model's default settings
    #[instrument(skip(self, contents), level = "debug")]
    pub async fn generate_content(
        &self,
        model: &str,
        system_instruction: Option<Content>,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents,
            system_instruction,
        };

        debug!(parts = request.contents.len(), "Calling {}", model);
        self.http_client
            .post(&format!("models/{model}:generateContent"), &request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::http::HttpOptions;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_generate_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Summarize"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Short summary"}]}}]}"#)
            .create_async()
            .await;

        let mut http =
            HttpClient::with_api_key_and_options("test-key".to_string(), HttpOptions::default())
                .unwrap();
        http.set_base_url(server.url());
        let models = ModelsService::new(http);

        let response = models
            .generate_content(
                "gemini-2.0-flash",
                None,
                vec![Content::new().with_role("user").with_text("Summarize")],
            )
            .await
            .unwrap();
        assert_eq!(response.text(), "Short summary");

        mock.assert_async().await;
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content::new().with_role("user").with_text("Hi")],
            system_instruction: Some(Content::new().with_text("Be brief")),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
