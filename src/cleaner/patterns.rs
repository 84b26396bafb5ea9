//! Ordered regex tables driving the cleaning pipeline.
//!
//! Each table is one pattern per row. Rows are compiled once, the first time
//! the table is used.

use regex::Regex;
use std::sync::LazyLock;

fn compile(flags: &str, patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("{flags}{p}")).expect("cleaner pattern is valid"))
        .collect()
}

/// Boilerplate phrases erased anywhere in the text. Banner-style rows may
/// span lines.
pub(crate) static WEB_ARTIFACTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "(?is)",
        &[
            r"Cookie\s+Policy.*?Accept",
            r"Privacy\s+Policy.*?Accept",
            r"This website uses cookies.*?Accept",
            r"Skip to (main )?content",
            r"Loading\.{3,}",
            r"Please enable JavaScript",
            r"Share on (Facebook|Twitter|LinkedIn|Instagram)",
            r"Follow us on",
            r"Subscribe to our newsletter",
            r"Sign up for updates",
            r"Advertisement",
            r"Sponsored content",
            r"Related articles?",
            r"You might also like",
            r"More from this author",
            r"Tags?:",
            r"Categories?:",
            r"Posted (on|by)",
            r"Published (on|by)",
            r"Last updated",
            r"Read more",
            r"Continue reading",
            r"Click here",
            r"Learn more",
            r"Get started",
            r"Try (it )?now",
            r"Download (now|here)",
            r"Buy now",
            r"Order now",
            r"Contact us",
            r"Call us",
            r"Email us",
        ],
    )
});

/// `[label](target)` reduced to `label`
pub(crate) static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link pattern is valid"));

pub(crate) static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern is valid"));

pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern is valid")
});

/// Whole lines that are menu furniture. Matched against the full trimmed line.
pub(crate) static NAVIGATION_LINES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "(?i)",
        &[
            r"^(Home|About|Contact|Services|Products|Blog|News|FAQ)$",
            r"^(Login|Register|Sign up|Sign in)$",
            r"^(Menu|Navigation|Breadcrumb)$",
            r"^(Previous|Next|Back|Forward)$",
            r"^(Page \d+|Go to page)$",
        ],
    )
});

/// Byline, tag and timestamp lines
pub(crate) static METADATA_LINES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "(?i)",
        &[
            r"^(Posted|Published|Updated|Modified|Created|By|Author|Date|Time):",
            r"^(Tags?|Categories?|Filed under):",
            r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}",
            r"^\d{1,2}:\d{2}(\s?(AM|PM))?",
        ],
    )
});

/// Three or more line breaks, possibly with whitespace between them
pub(crate) static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").expect("blank line pattern is valid"));

pub(crate) static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("whitespace pattern is valid"));

pub(crate) static SPACE_AROUND_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\n *").expect("newline pattern is valid"));

/// "1. Introduction" style headings
pub(crate) static NUMBERED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\s+[A-Z]").expect("heading pattern is valid"));

/// Discourse markers, +5 per row matched in the final score
pub(crate) static QUALITY_INDICATORS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "(?i)",
        &[
            r"\b(introduction|overview|summary|conclusion)\b",
            r"\b(important|significant|key|main|primary)\b",
            r"\b(example|instance|case|study)\b",
            r"\b(first|second|third|finally|lastly)\b",
        ],
    )
});

pub(crate) static KEY_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+\b").expect("phrase pattern is valid")
});

/// List markers; the first matching row wins for a line
pub(crate) static BULLETS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "",
        &[
            r"^\s*[-•*]\s+(.+)$",
            r"^\s*\d+\.\s+(.+)$",
            r"^\s*[a-zA-Z]\.\s+(.+)$",
        ],
    )
});

pub(crate) static NUMBERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "",
        &[
            r"\b\d+%",
            r"\b\d+\.\d+%",
            r"\$\d+(?:,\d{3})*(?:\.\d{2})?\b",
            r"\b\d+(?:,\d{3})*\b",
        ],
    )
});

pub(crate) static DATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(
        "(?i)",
        &[
            r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
            r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
            r"\b\d{1,2}\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{4}\b",
        ],
    )
});
