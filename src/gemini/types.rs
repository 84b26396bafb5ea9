//! Type definitions for the Gemini API

use serde::{Deserialize, Serialize};

/// A piece of content exchanged with the model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    /// The role of the content (e.g., "user", "model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts that make up this content
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new empty content
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the role for this content
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Add text to this content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }
}

/// A part of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Text content
    #[serde(rename = "text")]
    Text(String),
}

/// Response from content generation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// The generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Prompt feedback
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Get the text from the first candidate's first text part
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| {
                content.parts.iter().find_map(|part| match part {
                    Part::Text(text) => Some(text.clone()),
                })
            })
            .unwrap_or_default()
    }
}

/// A candidate response from the model
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content of the candidate
    #[serde(default)]
    pub content: Option<Content>,

    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback on the prompt
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked, if it was
    #[serde(default)]
    pub block_reason: Option<String>,
}
