//! Scoring functions used to rank extraction candidates

use regex::Regex;
use std::sync::LazyLock;

/// Discourse markers, +3 each when present in a candidate's text
static QUALITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(introduction|overview|summary|conclusion)\b",
        r"(?i)\b(first|second|third|finally)\b",
        r"(?i)\b(example|instance|case study)\b",
        r"(?i)\b(important|note|remember)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("quality pattern is valid"))
    .collect()
});

static CONTENT_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(article|guide|tutorial|introduction)\b").expect("keyword pattern is valid")
});

/// Per-tag bonus in the readability comparator
const TAG_SCORES: &[(&str, i32)] = &[
    ("article", 15),
    ("main", 15),
    ("section", 10),
    ("div", 5),
    ("p", 8),
    ("h1", 12),
    ("h2", 10),
    ("h3", 8),
];

const POSITIVE_INDICATORS: &[&str] = &["content", "article", "post", "main", "body"];
const NEGATIVE_INDICATORS: &[&str] = &["nav", "menu", "sidebar", "ad", "comment", "footer"];

/// Mean number of words per '.'-separated sentence, `None` without sentences
pub(crate) fn mean_sentence_words(text: &str) -> Option<f64> {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        return None;
    }
    let words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
    Some(words as f64 / sentences.len() as f64)
}

/// Cheap pre-cleaning quality score used to pick the winning strategy.
///
/// Texts under 50 words score 0 regardless of anything else.
pub fn score_content_quality(text: &str) -> u32 {
    let word_count = text.split_whitespace().count();
    if word_count < 50 {
        return 0;
    }

    let mut score = if word_count <= 2000 { 20 } else { 10 };

    if mean_sentence_words(text).is_some_and(|avg| (8.0..=30.0).contains(&avg)) {
        score += 10;
    }

    score += 3 * QUALITY_PATTERNS.iter().filter(|p| p.is_match(text)).count() as u32;
    score
}

/// Readability comparator for a single block element.
///
/// `class` and `id` are matched by substring, so `sidebar-ad` hits both the
/// `sidebar` and `ad` penalties.
pub fn score_element(tag: &str, class: &str, id: &str, text: &str) -> u32 {
    let mut score: i32 = 0;

    let word_count = text.split_whitespace().count();
    if (25..=500).contains(&word_count) {
        score += 10;
    } else if word_count > 500 {
        score += 5;
    }

    score += TAG_SCORES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map_or(0, |(_, bonus)| *bonus);

    let class = class.to_lowercase();
    let id = id.to_lowercase();
    let hits = |indicator: &str| class.contains(indicator) || id.contains(indicator);
    score += 5 * POSITIVE_INDICATORS.iter().filter(|i| hits(**i)).count() as i32;
    score -= 10 * NEGATIVE_INDICATORS.iter().filter(|i| hits(**i)).count() as i32;

    if CONTENT_KEYWORDS.is_match(text) {
        score += 5;
    }

    score.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_short_text_is_disqualified() {
        assert_eq!(score_content_quality(""), 0);
        assert_eq!(
            score_content_quality("An important introduction. First example."),
            0
        );
    }

    #[test]
    fn test_word_count_and_sentence_bands() {
        // 60 words in 6 sentences of 10 words
        let text = (0..6).map(|_| words(10)).collect::<Vec<_>>().join(". ");
        assert_eq!(score_content_quality(&text), 30);

        // one run-on sentence of 60 words misses the sentence band
        assert_eq!(score_content_quality(&words(60)), 20);

        assert_eq!(score_content_quality(&words(2500)), 10);
    }

    #[test]
    fn test_discourse_markers_add_three_each() {
        let base = (0..6).map(|_| words(10)).collect::<Vec<_>>().join(". ");
        let text = format!("{base}. In summary this is an important example to note");
        // summary, important/note, example
        assert_eq!(score_content_quality(&text), 30 + 9);
    }

    #[test]
    fn test_score_is_deterministic() {
        let text = format!("{}. Finally, a conclusion.", words(80));
        assert_eq!(score_content_quality(&text), score_content_quality(&text));
    }

    #[test]
    fn test_element_scoring() {
        let text = words(30);
        assert_eq!(score_element("article", "", "", &text), 25);
        assert_eq!(score_element("div", "post-content", "", &text), 25);
        assert_eq!(score_element("p", "", "", "A short guide"), 13);
        assert_eq!(score_element("span", "", "", &words(600)), 5);
    }

    #[test]
    fn test_sidebar_ad_scores_zero() {
        let text = format!("Buy now {}", words(30));
        assert_eq!(score_element("div", "sidebar-ad", "", &text), 0);
        assert_eq!(score_element("div", "", "main-nav", &text), 10);
    }
}
