//! Best-effort annotation of cleaned text

use super::patterns::{BULLETS, DATES, KEY_PHRASE, NUMBERS};
use super::quality::looks_like_heading;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const MAX_KEY_PHRASES: usize = 10;

/// Structural annotations pulled out of cleaned text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyInformation {
    pub key_phrases: Vec<String>,
    pub headings: Vec<String>,
    pub bullet_points: Vec<String>,
    pub numbers_and_stats: Vec<String>,
    pub dates: Vec<String>,
}

impl KeyInformation {
    pub fn is_empty(&self) -> bool {
        self.key_phrases.is_empty()
            && self.headings.is_empty()
            && self.bullet_points.is_empty()
            && self.numbers_and_stats.is_empty()
            && self.dates.is_empty()
    }
}

/// Keep first occurrences only
fn dedup(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn all_matches(patterns: &[Regex], text: &str) -> Vec<String> {
    dedup(
        patterns
            .iter()
            .flat_map(|p| p.find_iter(text).map(|m| m.as_str().to_string())),
    )
}

/// Key phrases, headings, list items, numbers and dates found in `text`
pub fn extract_key_information(text: &str) -> KeyInformation {
    if text.is_empty() {
        return KeyInformation::default();
    }

    let key_phrases = dedup(
        KEY_PHRASE
            .find_iter(text)
            .take(MAX_KEY_PHRASES)
            .map(|m| m.as_str().to_string()),
    );

    let headings = text
        .lines()
        .map(str::trim)
        .filter(|line| looks_like_heading(line))
        .map(str::to_string)
        .collect();

    let bullet_points = text
        .lines()
        .filter_map(|line| {
            BULLETS
                .iter()
                .find_map(|p| p.captures(line))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
        })
        .collect();

    KeyInformation {
        key_phrases,
        headings,
        bullet_points,
        numbers_and_stats: all_matches(&NUMBERS, text),
        dates: all_matches(&DATES, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Release Overview:\n\
        The Rust Foundation announced the new release on March 5, 2024 with support from Open Source Teams.\n\
        - Faster builds for large workspaces\n\
        2. Smaller binaries across targets\n\
        b. Better diagnostics\n\
        Adoption grew 45% while costs fell to $1,250.50 per month for 12,000 users.\n\
        The previous release shipped on 12/01/2023 and again on 5 Jan 2024.";

    #[test]
    fn test_key_information() {
        let info = extract_key_information(TEXT);

        assert_eq!(
            info.key_phrases,
            vec!["Release Overview", "The Rust Foundation", "Open Source Teams"]
        );
        assert_eq!(
            info.headings,
            vec!["Release Overview:", "2. Smaller binaries across targets"]
        );
        assert_eq!(
            info.bullet_points,
            vec![
                "Faster builds for large workspaces",
                "Smaller binaries across targets",
                "Better diagnostics",
            ]
        );
        assert!(info.numbers_and_stats.contains(&"45%".to_string()));
        assert!(info.numbers_and_stats.contains(&"$1,250.50".to_string()));
        assert!(info.numbers_and_stats.contains(&"12,000".to_string()));
        assert_eq!(info.dates, vec!["12/01/2023", "March 5, 2024", "5 Jan 2024"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_key_information("").is_empty());
    }

    #[test]
    fn test_numbers_are_deduplicated() {
        let info = extract_key_information("We saw 10 cats and 10 dogs.");
        assert_eq!(info.numbers_and_stats, vec!["10"]);
    }
}
