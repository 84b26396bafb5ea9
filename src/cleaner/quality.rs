//! Post-cleaning quality score and the heading heuristic

use super::patterns::{NUMBERED_HEADING, QUALITY_INDICATORS};
use crate::extractor::mean_sentence_words;
use std::collections::HashSet;

const MAX_SCORE: u32 = 100;

/// At least one cased character and no lowercase ones
fn is_upper(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Every cased run starts with an uppercase letter followed only by
/// lowercase letters, and there is at least one cased character
fn is_title(line: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;

    for c in line.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }

    cased
}

/// Whether a line reads like a section heading.
///
/// Short lines ending in a colon or written in capitals, numbered titles
/// such as `1. Introduction`, and short title-cased lines.
pub fn looks_like_heading(line: &str) -> bool {
    let len = line.chars().count();

    (len < 100 && (line.ends_with(':') || is_upper(line)))
        || NUMBERED_HEADING.is_match(line)
        || (len < 80 && is_title(line))
}

/// User-facing quality score of cleaned text, 0 to 100
pub fn calculate_quality_score(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let mut score = 0;
    let word_count = text.split_whitespace().count();

    score += match word_count {
        100..=3000 => 30,
        50..=99 => 10,
        n if n > 3000 => 20,
        _ => 0,
    };

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if !lines.is_empty() {
        let total: usize = lines.iter().map(|l| l.chars().count()).sum();
        let mean = total as f64 / lines.len() as f64;
        if (30.0..=150.0).contains(&mean) {
            score += 20;
        }
    }

    if mean_sentence_words(text).is_some_and(|avg| (8.0..=25.0).contains(&avg)) {
        score += 20;
    }

    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if !words.is_empty() {
        let unique: HashSet<&str> = words.iter().copied().collect();
        if unique.len() as f64 / words.len() as f64 > 0.3 {
            score += 15;
        }
    }

    score += 5 * QUALITY_INDICATORS.iter().filter(|p| p.is_match(text)).count() as u32;

    score.min(MAX_SCORE)
}
