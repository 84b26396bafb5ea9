//! Hyperlink discovery and categorization

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::normalize::{host_of, normalize_url};
use super::types::{ClassifiedLinks, ExternalKind, Link, LinkCategory};
use crate::dom::{class_and_id, inline_text, parse_selectors};

const NAVIGATION_SELECTORS: &[&str] = &[
    "nav a",
    "navigation a",
    ".nav a",
    ".navbar a",
    ".navigation a",
    ".menu a",
    ".main-nav a",
    ".primary-nav a",
    ".site-nav a",
    ".top-nav a",
    ".header-nav a",
    "[role=\"navigation\"] a",
    ".nav-menu a",
    ".menu-bar a",
    ".nav-bar a",
    "header nav a",
    "header .nav a",
    "header .menu a",
    ".header-menu a",
    ".site-header nav a",
    ".site-header .nav a",
    ".site-header .menu a",
];

const CONTENT_SELECTORS: &[&str] = &[
    "article a",
    "main a",
    ".content a",
    ".post-content a",
    ".entry-content a",
    ".article-content a",
    "#content a",
    ".main-content a",
    ".page-content a",
];

const FOOTER_SELECTORS: &[&str] = &[
    "footer a",
    ".footer a",
    ".site-footer a",
    "#footer a",
    ".page-footer a",
];

/// Keywords that raise the priority of navigation/content/footer links
const PRIORITY_KEYWORDS: &[&str] = &[
    "about",
    "services",
    "products",
    "contact",
    "home",
    "documentation",
    "guide",
    "tutorial",
    "help",
];

/// Keywords that mark a link as important for the crawl
const IMPORTANT_KEYWORDS: &[&str] = &[
    "about",
    "contact",
    "services",
    "products",
    "pricing",
    "documentation",
    "docs",
    "api",
    "guide",
    "tutorial",
    "help",
    "support",
    "faq",
    "download",
    "get started",
    "sign up",
    "register",
    "login",
    "dashboard",
];

/// Known social and code-hosting domains with their display names
const SOCIAL_PLATFORMS: &[(&str, &str)] = &[
    ("facebook.com", "Facebook"),
    ("twitter.com", "Twitter"),
    ("x.com", "X (Twitter)"),
    ("linkedin.com", "LinkedIn"),
    ("instagram.com", "Instagram"),
    ("youtube.com", "YouTube"),
    ("tiktok.com", "TikTok"),
    ("pinterest.com", "Pinterest"),
    ("snapchat.com", "Snapchat"),
    ("reddit.com", "Reddit"),
    ("github.com", "GitHub"),
    ("gitlab.com", "GitLab"),
];

const DOWNLOAD_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz",
    ".exe", ".dmg", ".pkg", ".mp3", ".mp4", ".avi", ".mov", ".wav", ".jpg", ".png", ".gif",
];

const DOWNLOAD_KEYWORDS: &[&str] = &["download", "get", "save", "export", "pdf", "file"];

/// Extension groups mapped to a coarse file type, first match wins
const FILE_TYPES: &[(&[&str], &str)] = &[
    (&[".pdf"], "PDF"),
    (&[".doc", ".docx"], "Word Document"),
    (&[".xls", ".xlsx"], "Excel Spreadsheet"),
    (&[".ppt", ".pptx"], "PowerPoint Presentation"),
    (&[".zip", ".rar", ".tar", ".gz"], "Archive"),
    (&[".jpg", ".jpeg", ".png", ".gif"], "Image"),
    (&[".mp3", ".wav"], "Audio"),
    (&[".mp4", ".avi", ".mov"], "Video"),
];

static NUMERIC_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("numeric text regex"));

static STRUCTURAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>{}\[\]\\]").expect("structural chars regex"));

static FILE_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(KB|MB|GB)").expect("file size regex")
});

static NAVIGATION: LazyLock<Vec<Selector>> =
    LazyLock::new(|| parse_selectors(NAVIGATION_SELECTORS));
static CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_selectors(CONTENT_SELECTORS));
static FOOTER: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_selectors(FOOTER_SELECTORS));
static ANCHORS: LazyLock<Vec<Selector>> = LazyLock::new(|| parse_selectors(&["a[href]"]));

/// Priority of a link given its text, raw href and category.
///
/// Category base, plus a text-length band, plus 3 per priority keyword,
/// minus 5 for purely numeric text and 3 for `javascript:`/`mailto:` hrefs.
pub fn link_priority(text: &str, href: &str, category: LinkCategory) -> i32 {
    let mut score = category.base_priority();

    let len = text.chars().count();
    if (5..=30).contains(&len) {
        score += 5;
    } else if (31..=50).contains(&len) {
        score += 3;
    }

    let lowered = text.to_lowercase();
    score += 3 * PRIORITY_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(**keyword))
        .count() as i32;

    if NUMERIC_TEXT.is_match(text) {
        score -= 5;
    }

    if href.contains("javascript:") || href.contains("mailto:") {
        score -= 3;
    }

    score
}

/// Anchor found in the document, resolved against the base URL
struct Anchor<'a> {
    element: ElementRef<'a>,
    href: &'a str,
    url: String,
    text: String,
}

fn anchors<'a>(document: &'a Html, selectors: &[Selector], base_url: &str) -> Vec<Anchor<'a>> {
    selectors
        .iter()
        .flat_map(|selector| document.select(selector))
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = normalize_url(href, base_url)?;
            Some(Anchor {
                element,
                href,
                url,
                text: inline_text(element),
            })
        })
        .collect()
}

/// Stateless hyperlink classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkClassifier;

impl LinkClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify every link of `html` relative to `base_url`
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub fn classify(&self, html: &str, base_url: &str) -> ClassifiedLinks {
        let document = Html::parse_document(html);
        let base_host = host_of(base_url);

        let mut links = ClassifiedLinks {
            navigation: self.navigation_links(&document, base_url),
            content: self.scoped_links(&document, &CONTENT, base_url, LinkCategory::Content, None),
            footer: self.scoped_links(
                &document,
                &FOOTER,
                base_url,
                LinkCategory::Footer,
                Some(50),
            ),
            ..Default::default()
        };

        let all = anchors(&document, &ANCHORS, base_url);
        links.external = self.external_links(&all, base_host.as_deref());
        links.important = self.important_links(&all);
        links.social = self.social_links(&all);
        links.download = self.download_links(&all);

        debug!(summary = ?links.summary(), "Classified links for {}", base_url);
        links
    }

    fn navigation_links(&self, document: &Html, base_url: &str) -> Vec<Link> {
        let mut seen = HashSet::new();
        let mut links: Vec<Link> = anchors(document, &NAVIGATION, base_url)
            .into_iter()
            .filter(|a| is_valid_navigation_text(&a.text, a.href))
            .filter(|a| seen.insert(a.url.clone()))
            .map(|a| {
                let priority = link_priority(&a.text, a.href, LinkCategory::Navigation);
                Link::new(a.url, a.text, LinkCategory::Navigation, priority)
            })
            .collect();
        sort_by_priority(&mut links);
        links
    }

    fn scoped_links(
        &self,
        document: &Html,
        selectors: &[Selector],
        base_url: &str,
        category: LinkCategory,
        max_text_len: Option<usize>,
    ) -> Vec<Link> {
        let mut seen = HashSet::new();
        let mut links: Vec<Link> = anchors(document, selectors, base_url)
            .into_iter()
            .filter(|a| !a.text.is_empty())
            .filter(|a| max_text_len.is_none_or(|max| a.text.chars().count() <= max))
            .filter(|a| seen.insert(a.url.clone()))
            .map(|a| {
                let priority = link_priority(&a.text, a.href, category);
                Link::new(a.url, a.text, category, priority)
            })
            .collect();
        sort_by_priority(&mut links);
        links
    }

    fn external_links(&self, anchors: &[Anchor<'_>], base_host: Option<&str>) -> Vec<Link> {
        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter(|a| !a.text.is_empty())
            .filter_map(|a| {
                let host = host_of(&a.url)?;
                (Some(host.as_str()) != base_host).then_some((a, host))
            })
            .filter(|(a, _)| seen.insert(a.url.clone()))
            .map(|(a, host)| {
                let priority = link_priority(&a.text, a.href, LinkCategory::External);
                let mut link = Link::new(&a.url, &a.text, LinkCategory::External, priority);
                link.external_type = Some(classify_external(&host));
                link.domain = Some(host);
                link
            })
            .collect()
    }

    fn important_links(&self, anchors: &[Anchor<'_>]) -> Vec<Link> {
        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter_map(|a| {
                let text = a.text.to_lowercase();
                let (classes, id) = class_and_id(a.element);
                let keywords: Vec<String> = IMPORTANT_KEYWORDS
                    .iter()
                    .filter(|k| text.contains(*k) || classes.contains(*k) || id.contains(*k))
                    .map(|k| k.to_string())
                    .collect();
                (!keywords.is_empty()).then_some((a, keywords))
            })
            .filter(|(a, _)| seen.insert(a.url.clone()))
            .map(|(a, keywords)| {
                let priority = link_priority(&a.text, a.href, LinkCategory::Important);
                let mut link = Link::new(&a.url, &a.text, LinkCategory::Important, priority);
                link.keywords = keywords;
                link
            })
            .collect()
    }

    fn social_links(&self, anchors: &[Anchor<'_>]) -> Vec<Link> {
        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter_map(|a| {
                let host = host_of(&a.url)?;
                let (_, platform) = SOCIAL_PLATFORMS
                    .iter()
                    .find(|(domain, _)| host_matches(&host, domain))?;
                Some((a, platform.to_string()))
            })
            .filter(|(a, _)| seen.insert(a.url.clone()))
            .map(|(a, platform)| {
                let priority = link_priority(&a.text, a.href, LinkCategory::Social);
                let mut link = Link::new(&a.url, &a.text, LinkCategory::Social, priority);
                link.platform = Some(platform);
                link
            })
            .collect()
    }

    fn download_links(&self, anchors: &[Anchor<'_>]) -> Vec<Link> {
        let mut seen = HashSet::new();
        anchors
            .iter()
            .filter(|a| {
                let path = url_path(&a.url);
                let text = a.text.to_lowercase();
                DOWNLOAD_EXTENSIONS.iter().any(|ext| path.ends_with(*ext))
                    || DOWNLOAD_KEYWORDS.iter().any(|k| text.contains(*k))
            })
            .filter(|a| seen.insert(a.url.clone()))
            .map(|a| {
                let priority = link_priority(&a.text, a.href, LinkCategory::Download);
                let mut link = Link::new(&a.url, &a.text, LinkCategory::Download, priority);
                link.file_type = Some(file_type(&a.url).to_string());
                link.size_estimate = Some(estimate_size(a.element, &a.text));
                link
            })
            .collect()
    }
}

/// Classify every link of `html` relative to `base_url`
pub fn classify_links(html: &str, base_url: &str) -> ClassifiedLinks {
    LinkClassifier::new().classify(html, base_url)
}

fn sort_by_priority(links: &mut [Link]) {
    links.sort_by(|a, b| b.priority.cmp(&a.priority));
}

fn is_valid_navigation_text(text: &str, href: &str) -> bool {
    let len = text.chars().count();
    (2..=100).contains(&len) && text != href && !STRUCTURAL_CHARS.is_match(text)
}

/// Exact host or any subdomain of `domain`
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn classify_external(host: &str) -> ExternalKind {
    let host = host.to_lowercase();
    let any = |needles: &[&str]| needles.iter().any(|n| host.contains(n));

    if any(&["facebook", "twitter", "x.com", "linkedin", "instagram"]) {
        ExternalKind::Social
    } else if any(&["github", "gitlab", "bitbucket"]) {
        ExternalKind::CodeRepository
    } else if any(&["docs.", "documentation", "wiki"]) {
        ExternalKind::Documentation
    } else if any(&["news", "blog"]) {
        ExternalKind::NewsBlog
    } else {
        ExternalKind::General
    }
}

fn url_path(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default()
}

fn file_type(url: &str) -> &'static str {
    let path = url_path(url);
    FILE_TYPES
        .iter()
        .find(|(extensions, _)| extensions.iter().any(|ext| path.ends_with(*ext)))
        .map(|(_, label)| *label)
        .unwrap_or("Unknown")
}

/// Size hint from the link text, then from the text around the link
fn estimate_size(element: ElementRef<'_>, text: &str) -> String {
    let adjacent = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(inline_text)
        .unwrap_or_default();

    [text, adjacent.as_str()]
        .into_iter()
        .find_map(|candidate| FILE_SIZE.captures(candidate))
        .map(|caps| format!("{} {}", &caps[1], caps[2].to_uppercase()))
        .unwrap_or_else(|| "Unknown".to_string())
}
