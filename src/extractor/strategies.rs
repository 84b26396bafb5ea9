//! The four extraction strategies

use super::ExtractionCandidate;
use super::metadata::{extract_description, extract_title};
use super::scoring::score_element;
use crate::dom::{class_and_id, parse_selectors, select_in, strip_regions, visible_text};
use scraper::{ElementRef, Html, Selector};
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Minimum characters for a readability candidate
const MIN_BLOCK_CHARS: usize = 25;
/// Blocks kept by the readability strategy
const READABILITY_TOP_N: usize = 10;
/// Readability score a block must exceed to be kept
const READABILITY_MIN_SCORE: u32 = 5;
/// Minimum characters for a density candidate
const MIN_DENSE_CHARS: usize = 100;
/// Blocks kept by the density strategy
const DENSITY_TOP_N: usize = 5;
/// Density a block must exceed to be kept
const MIN_DENSITY: f64 = 0.1;

static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_selectors(&[
        "article",
        "main",
        r#"[role="main"]"#,
        ".content",
        ".post-content",
        ".entry-content",
        ".article-content",
        "#content",
        ".main-content",
        ".page-content",
    ])
});

static NOISE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    parse_selectors(&[
        "nav",
        "header",
        "footer",
        "aside",
        ".sidebar",
        ".menu",
        ".navigation",
        ".ads",
        ".advertisement",
        ".banner",
        ".social",
        ".share",
        ".comments",
        ".related",
        ".recommended",
        "script",
        "style",
        "noscript",
    ])
});

static RAW_NOISE_SELECTORS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_selectors(&["script", "style", "nav", "header", "footer"]));

static READABILITY_BLOCKS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_selectors(&["p, div, article, section"]));

static DENSITY_BLOCKS: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_selectors(&["div, section, article, main"]));

static BODY: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_selectors(&["body"]));

/// One self-contained heuristic for isolating article content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Strip noise regions, take the first main-content container
    SemanticHtml,
    /// Score block elements, keep the best ten
    Readability,
    /// Keep the blocks with the least markup per character of text
    TextDensity,
    /// Everything outside script/style/nav/header/footer
    RawFallback,
}

impl Strategy {
    /// Every strategy, in the order they are run
    pub const ALL: [Strategy; 4] = [
        Strategy::SemanticHtml,
        Strategy::Readability,
        Strategy::TextDensity,
        Strategy::RawFallback,
    ];

    /// Label recorded as the extraction method
    pub fn label(self) -> &'static str {
        match self {
            Strategy::SemanticHtml => "semantic_html",
            Strategy::Readability => "readability",
            Strategy::TextDensity => "text_density",
            Strategy::RawFallback => "raw_parsing",
        }
    }

    /// Run the strategy against a full HTML document
    pub fn run(self, html: &str) -> ExtractionCandidate {
        let mut document = Html::parse_document(html);

        let text = match self {
            Strategy::SemanticHtml => {
                strip_regions(&mut document, &NOISE_SELECTORS);
                semantic_text(&document)
            }
            Strategy::Readability => readability_text(&document),
            Strategy::TextDensity => {
                strip_regions(&mut document, &NOISE_SELECTORS);
                density_text(&document)
            }
            Strategy::RawFallback => {
                strip_regions(&mut document, &RAW_NOISE_SELECTORS);
                visible_text(document.root_element(), "\n")
            }
        };

        ExtractionCandidate {
            text,
            title: extract_title(&document),
            description: extract_description(&document),
            source_label: self.label().to_string(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn select_all<'a>(
    document: &'a Html,
    selectors: &'a [Selector],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    selectors.iter().flat_map(move |s| select_in(document, s))
}

fn semantic_text(document: &Html) -> String {
    CONTENT_SELECTORS
        .iter()
        .filter_map(|selector| select_in(document, selector).next())
        .map(|element| visible_text(element, "\n"))
        .find(|text| !text.is_empty())
        .or_else(|| {
            select_all(document, &BODY)
                .next()
                .map(|body| visible_text(body, "\n"))
        })
        .unwrap_or_default()
}

fn readability_text(document: &Html) -> String {
    let mut scored: Vec<(u32, String)> = select_all(document, &READABILITY_BLOCKS)
        .filter_map(|element| {
            let text = visible_text(element, " ");
            if text.chars().count() < MIN_BLOCK_CHARS {
                return None;
            }
            let (class, id) = class_and_id(element);
            let score = score_element(element.value().name(), &class, &id, &text);
            (score > 0).then_some((score, text))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(READABILITY_TOP_N)
        .filter(|(score, _)| *score > READABILITY_MIN_SCORE)
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn density_text(document: &Html) -> String {
    let mut blocks: Vec<(f64, String)> = select_all(document, &DENSITY_BLOCKS)
        .filter_map(|element| {
            let text = visible_text(element, " ");
            let text_len = text.chars().count();
            if text_len <= MIN_DENSE_CHARS {
                return None;
            }
            let markup_len = element.html().chars().count();
            let density = if markup_len > 0 {
                text_len as f64 / markup_len as f64
            } else {
                0.0
            };
            Some((density, text))
        })
        .collect();

    blocks.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    blocks
        .into_iter()
        .take(DENSITY_TOP_N)
        .filter(|(density, _)| *density > MIN_DENSITY)
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"<html><head><title>Guide to Rust ownership</title></head>
<body>
<header><h1>Site Header</h1></header>
<nav><a href="/">Home</a><a href="/about">About</a></nav>
<article class="post-content">
  <h1>Understanding ownership</h1>
  <p>Ownership is the central idea of the language and this guide explains how values move between bindings.</p>
  <p>Borrowing lets a function use a value without taking ownership, which keeps the caller in control of its data.</p>
</article>
<div class="sidebar-ad">Buy now and save a huge amount of money on premium widgets today</div>
<footer>Copyright notice</footer>
<script>var tracking = "ignored";</script>
</body></html>"#;

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Strategy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["semantic_html", "readability", "text_density", "raw_parsing"]
        );
    }

    #[test]
    fn test_semantic_takes_article() {
        let candidate = Strategy::SemanticHtml.run(ARTICLE_PAGE);
        assert_eq!(candidate.source_label, "semantic_html");
        assert!(candidate.text.starts_with("Understanding ownership\nOwnership is"));
        assert!(!candidate.text.contains("Buy now"));
        assert!(!candidate.text.contains("Home"));
        assert_eq!(candidate.title, "Understanding ownership");
    }

    #[test]
    fn test_semantic_falls_back_to_body() {
        let candidate =
            Strategy::SemanticHtml.run("<html><body><nav>Menu</nav><p>Plain body text</p></body></html>");
        assert_eq!(candidate.text, "Plain body text");
    }

    #[test]
    fn test_readability_excludes_sidebar_ad() {
        let candidate = Strategy::Readability.run(ARTICLE_PAGE);
        assert!(candidate.text.contains("Borrowing lets a function"));
        assert!(!candidate.text.contains("Buy now"));
        assert!(candidate.text.contains("\n\n"));
    }

    #[test]
    fn test_density_skips_stripped_regions() {
        let candidate = Strategy::TextDensity.run(ARTICLE_PAGE);
        assert!(candidate.text.contains("Ownership is the central idea"));
        assert!(!candidate.text.contains("Buy now"));
    }

    #[test]
    fn test_raw_fallback_keeps_everything_visible() {
        let candidate = Strategy::RawFallback.run(ARTICLE_PAGE);
        assert!(candidate.text.contains("Buy now"));
        assert!(candidate.text.contains("Borrowing lets a function"));
        assert!(!candidate.text.contains("Site Header"));
        assert!(!candidate.text.contains("tracking"));
        assert!(!candidate.text.contains("Copyright"));
    }
}
