//! # Content Extraction Module
//!
//! Decides which part of a page is "the article". Four independent
//! strategies each produce a candidate from the same HTML; candidates are
//! compared with a cheap pre-cleaning quality score and the best one wins.
//!
//! ## Key Components
//!
//! - `Strategy`: semantic selectors, readability scoring, text density and a
//!   raw fallback
//! - `score_content_quality` / `score_element`: the two scoring functions
//! - `ContentExtractor`: runs the strategies and applies the optional
//!   `TextTransformer` hook
//!
//! Extraction never fails. When no strategy produces a positive score the
//! result is an empty candidate labelled `none`.

mod hook;
mod metadata;
mod scoring;
mod strategies;

pub use hook::{DEFAULT_MODEL, GeminiTransformer, HookError, TextTransformer};
pub use metadata::{extract_description, extract_title};
pub use scoring::{score_content_quality, score_element};
pub use strategies::Strategy;

pub(crate) use scoring::mean_sentence_words;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Label of the empty candidate returned when every strategy fails
pub const NO_STRATEGY: &str = "none";

/// Text and metadata produced by one strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionCandidate {
    pub text: String,
    pub title: String,
    pub description: String,
    pub source_label: String,
}

impl ExtractionCandidate {
    /// The candidate used when nothing could be extracted
    pub fn empty() -> Self {
        Self {
            source_label: NO_STRATEGY.to_string(),
            ..Default::default()
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Winning candidate plus its pre-cleaning score
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub candidate: ExtractionCandidate,
    pub quality_score: u32,
    pub instructions_applied: bool,
}

/// Multi-strategy content extractor
#[derive(Clone, Default)]
pub struct ContentExtractor {
    transformer: Option<Arc<dyn TextTransformer>>,
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a hook used by `extract_with_instructions`
    pub fn with_transformer(mut self, transformer: Arc<dyn TextTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Run every strategy and keep the best-scoring candidate.
    ///
    /// A candidate replaces the current best only with a strictly higher
    /// score, so ties go to the strategy that ran first.
    pub fn extract(&self, html: &str, url: &str) -> ExtractionCandidate {
        self.select(html, url).0
    }

    #[instrument(skip(self, html), fields(html_len = html.len()))]
    fn select(&self, html: &str, url: &str) -> (ExtractionCandidate, u32) {
        let mut best = ExtractionCandidate::empty();
        let mut best_score = 0;

        for strategy in Strategy::ALL {
            let candidate = strategy.run(html);
            if candidate.text.is_empty() {
                debug!(strategy = %strategy, "Strategy produced no text");
                continue;
            }

            let score = score_content_quality(&candidate.text);
            debug!(strategy = %strategy, score, words = candidate.word_count(), "Scored candidate");
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }

        debug!(method = %best.source_label, score = best_score, "Selected extraction");
        (best, best_score)
    }

    /// Extract content, then rewrite it with the hook when an instruction is
    /// given. Hook failures are logged and the unmodified text is kept.
    pub async fn extract_with_instructions(
        &self,
        html: &str,
        url: &str,
        instructions: Option<&str>,
    ) -> Extraction {
        let (mut candidate, quality_score) = self.select(html, url);
        let mut instructions_applied = false;

        let instruction = instructions.map(str::trim).filter(|i| !i.is_empty());
        if let (Some(instruction), Some(transformer)) = (instruction, &self.transformer) {
            if !candidate.text.is_empty() {
                match transformer.transform(url, &candidate.text, instruction).await {
                    Ok(text) => {
                        candidate.text = text;
                        instructions_applied = true;
                    }
                    Err(e) => warn!(url, "Custom instructions not applied: {}", e),
                }
            }
        } else if instruction.is_some() {
            warn!(url, "Custom instructions given but no text transformer is configured");
        }

        Extraction {
            candidate,
            quality_score,
            instructions_applied,
        }
    }
}
