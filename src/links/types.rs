//! Link model shared by the classifier, the frontier and the exporters

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket a hyperlink is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    Navigation,
    Content,
    Footer,
    External,
    Important,
    Social,
    Download,
}

impl LinkCategory {
    /// Every category, in classification order
    pub const ALL: [LinkCategory; 7] = [
        LinkCategory::Navigation,
        LinkCategory::Content,
        LinkCategory::Footer,
        LinkCategory::External,
        LinkCategory::Important,
        LinkCategory::Social,
        LinkCategory::Download,
    ];

    /// Base priority contributed by the category
    pub fn base_priority(self) -> i32 {
        match self {
            LinkCategory::Navigation => 10,
            LinkCategory::Content => 5,
            LinkCategory::Footer => 3,
            _ => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkCategory::Navigation => "navigation",
            LinkCategory::Content => "content",
            LinkCategory::Footer => "footer",
            LinkCategory::External => "external",
            LinkCategory::Important => "important",
            LinkCategory::Social => "social",
            LinkCategory::Download => "download",
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-type of an external link, derived from its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalKind {
    Social,
    CodeRepository,
    Documentation,
    NewsBlog,
    General,
}

/// A classified hyperlink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Normalized absolute URL
    pub url: String,

    /// Visible link text
    pub text: String,

    /// Category the link was classified into
    pub category: LinkCategory,

    /// Priority score, higher is more relevant
    pub priority: i32,

    /// Host of the link (external links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// External sub-type (external links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_type: Option<ExternalKind>,

    /// Keywords that made the link important (important links)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Human-readable platform name (social links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Coarse file type label (download links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,

    /// Size estimate such as `"2.5 MB"` or `"Unknown"` (download links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_estimate: Option<String>,
}

impl Link {
    /// Create a link without category-specific detail
    pub fn new(
        url: impl Into<String>,
        text: impl Into<String>,
        category: LinkCategory,
        priority: i32,
    ) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
            category,
            priority,
            domain: None,
            external_type: None,
            keywords: Vec::new(),
            platform: None,
            file_type: None,
            size_estimate: None,
        }
    }
}

/// Aggregate link counts for one document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub important_links: usize,
}

/// All links of a document, one ordered sequence per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLinks {
    pub navigation: Vec<Link>,
    pub content: Vec<Link>,
    pub footer: Vec<Link>,
    pub external: Vec<Link>,
    pub important: Vec<Link>,
    pub social: Vec<Link>,
    pub download: Vec<Link>,
}

impl ClassifiedLinks {
    /// Links of a single category
    pub fn get(&self, category: LinkCategory) -> &[Link] {
        match category {
            LinkCategory::Navigation => &self.navigation,
            LinkCategory::Content => &self.content,
            LinkCategory::Footer => &self.footer,
            LinkCategory::External => &self.external,
            LinkCategory::Important => &self.important,
            LinkCategory::Social => &self.social,
            LinkCategory::Download => &self.download,
        }
    }

    /// Iterate categories together with their links
    pub fn iter(&self) -> impl Iterator<Item = (LinkCategory, &[Link])> {
        LinkCategory::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Aggregate counts
    pub fn summary(&self) -> LinkSummary {
        LinkSummary {
            total_links: self.iter().map(|(_, links)| links.len()).sum(),
            internal_links: self.navigation.len() + self.content.len() + self.footer.len(),
            external_links: self.external.len(),
            important_links: self.important.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, links)| links.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut links = ClassifiedLinks::default();
        links
            .navigation
            .push(Link::new("https://a.com/x", "X", LinkCategory::Navigation, 10));
        links
            .footer
            .push(Link::new("https://a.com/y", "Y", LinkCategory::Footer, 3));
        links
            .external
            .push(Link::new("https://b.com", "B", LinkCategory::External, 0));
        links
            .social
            .push(Link::new("https://github.com/a", "GH", LinkCategory::Social, 0));

        let summary = links.summary();
        assert_eq!(summary.total_links, 4);
        assert_eq!(summary.internal_links, 2);
        assert_eq!(summary.external_links, 1);
        assert_eq!(summary.important_links, 0);
        assert!(!links.is_empty());
    }

    #[test]
    fn test_link_detail_omitted_from_json() {
        let link = Link::new("https://a.com", "A", LinkCategory::Content, 5);
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["category"], "content");
        assert!(json.get("platform").is_none());
        assert!(json.get("keywords").is_none());
    }
}
