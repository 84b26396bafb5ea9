//! # Content Cleaning Module
//!
//! Turns extracted page text into readable prose with a fixed six-stage
//! pipeline, then scores the result.
//!
//! ## Stages
//!
//! 1. Whitespace normalization
//! 2. Web-artifact removal (banners, share buttons, bare URLs and emails)
//! 3. Navigation-line removal
//! 4. Quality-line filtering
//! 5. Structure improvement around headings
//! 6. Final normalization and sentence-terminator repair
//!
//! The score computed here is the user-facing one. It is independent of the
//! extractor's pre-cleaning score and the two may disagree.

mod key_info;
mod patterns;
mod pipeline;
mod quality;

pub use key_info::{KeyInformation, extract_key_information};
pub use quality::{calculate_quality_score, looks_like_heading};

use pipeline::Stage;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Output of the cleaning pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningResult {
    pub cleaned_text: String,
    pub word_count: usize,
    /// One human-readable entry per stage with the size before and after
    pub steps: Vec<String>,
    pub quality_score: u32,
    /// Share of the input removed, in `[0, 1]`
    pub reduction_ratio: f64,
}

/// Run the cleaning pipeline. Empty input yields an all-zero result.
#[instrument(skip(raw), fields(raw_len = raw.len()))]
pub fn clean_content(raw: &str) -> CleaningResult {
    if raw.is_empty() {
        return CleaningResult::default();
    }

    let original_len = raw.chars().count();
    let mut text = raw.to_string();
    let mut steps = Vec::with_capacity(Stage::ALL.len());

    for stage in Stage::ALL {
        let before = text.chars().count();
        text = stage.apply(&text);
        let after = text.chars().count();
        debug!(stage = stage.name(), before, after, "Cleaning stage done");
        steps.push(format!("{}: {} → {} chars", stage.name(), before, after));
    }

    let cleaned_len = text.chars().count();
    let reduction_ratio =
        ((original_len as f64 - cleaned_len as f64) / original_len as f64).clamp(0.0, 1.0);

    CleaningResult {
        word_count: text.split_whitespace().count(),
        quality_score: calculate_quality_score(&text),
        cleaned_text: text,
        steps,
        reduction_ratio,
    }
}
