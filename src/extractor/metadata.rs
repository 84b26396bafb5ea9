//! Page title and description lookup

use crate::dom::{inline_text, parse_selectors, select_in};
use scraper::{Html, Selector};
use std::sync::LazyLock;

const UNTITLED: &str = "Untitled";

/// Description cut-off in characters
const MAX_DESCRIPTION_CHARS: usize = 200;

static TITLE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_selectors(&[
        "h1",
        "title",
        ".title",
        ".page-title",
        ".post-title",
        ".article-title",
    ])
});

static META_DESCRIPTION: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_selectors(&[
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ])
});

static PARAGRAPH: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_selectors(&["p"]));

/// First title candidate longer than 5 characters, else `"Untitled"`.
///
/// Only the first element of each selector is considered.
pub fn extract_title(document: &Html) -> String {
    TITLE_SELECTORS
        .iter()
        .filter_map(|selector| select_in(document, selector).next())
        .map(inline_text)
        .find(|title| title.chars().count() > 5)
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Meta description, then Open Graph description, then the first paragraph
/// when it is longer than 20 characters (cut to 200 characters plus `...`).
pub fn extract_description(document: &Html) -> String {
    let meta = META_DESCRIPTION.iter().find_map(|selector| {
        select_in(document, selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .filter(|content| !content.is_empty())
    });
    if let Some(content) = meta {
        return content.to_string();
    }

    let Some(first_paragraph) = PARAGRAPH
        .first()
        .and_then(|selector| select_in(document, selector).next())
    else {
        return String::new();
    };

    let text = inline_text(first_paragraph);
    match text.chars().count() {
        n if n <= 20 => String::new(),
        n if n > MAX_DESCRIPTION_CHARS => {
            let cut: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
            format!("{cut}...")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_h1() {
        let doc = Html::parse_document(
            "<html><head><title>Site title here</title></head><body><h1>Main heading</h1></body></html>",
        );
        assert_eq!(extract_title(&doc), "Main heading");
    }

    #[test]
    fn test_title_skips_short_candidates() {
        let doc = Html::parse_document(
            "<html><head><title>Site title here</title></head><body><h1>Hi</h1></body></html>",
        );
        assert_eq!(extract_title(&doc), "Site title here");

        let doc = Html::parse_document("<html><body><h1>Hey</h1></body></html>");
        assert_eq!(extract_title(&doc), "Untitled");
    }

    #[test]
    fn test_description_sources() {
        let doc = Html::parse_document(
            r#"<html><head><meta name="description" content="Meta text">
            <meta property="og:description" content="OG text"></head><body><p>A paragraph that is long enough</p></body></html>"#,
        );
        assert_eq!(extract_description(&doc), "Meta text");

        let doc = Html::parse_document(
            r#"<html><head><meta property="og:description" content="OG text"></head><body></body></html>"#,
        );
        assert_eq!(extract_description(&doc), "OG text");

        let doc = Html::parse_document(
            "<html><body><p>A paragraph that is long enough</p></body></html>",
        );
        assert_eq!(extract_description(&doc), "A paragraph that is long enough");
    }

    #[test]
    fn test_description_truncation() {
        let long = "x".repeat(250);
        let doc = Html::parse_document(&format!("<html><body><p>{long}</p></body></html>"));
        let description = extract_description(&doc);
        assert_eq!(description.chars().count(), 203);
        assert!(description.ends_with("..."));

        let doc = Html::parse_document("<html><body><p>Too short</p><p>Second paragraph is long enough</p></body></html>");
        assert_eq!(extract_description(&doc), "");
    }
}
