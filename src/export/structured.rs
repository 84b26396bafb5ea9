use crate::crawler::PageResult;
use crate::links::{ClassifiedLinks, Link, host_of};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Value of `metadata.export_format`
pub const EXPORT_FORMAT: &str = "structured_json";

const UNKNOWN_ERROR: &str = "Unknown error";

/// Nested export of one or more page results.
///
/// A single page produces `metadata` + `pages`. Several pages add `summary`
/// and `metadata.failed_pages`, and failed pages carry only their error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredExport {
    pub metadata: ExportMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ExportSummary>,
    pub pages: Vec<ExportedPage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub scraped_at: DateTime<Utc>,
    pub total_pages: usize,
    pub successful_pages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_pages: Option<usize>,
    pub export_format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_word_count: usize,
    /// Mean final quality score of successful pages, 0 when there are none
    pub average_quality_score: f64,
    pub unique_domains: usize,
    pub total_important_links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedPage {
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ExportedContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ExportedLinks>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedContent {
    pub cleaned_text: String,
    pub word_count: usize,
    pub quality_score: u32,
    pub extraction_method: String,
}

/// Link categories carried into exports. Content and footer links stay in
/// the full page result only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportedLinks {
    pub important: Vec<Link>,
    pub navigation: Vec<Link>,
    pub external: Vec<Link>,
    pub social: Vec<Link>,
    pub download: Vec<Link>,
}

impl From<&ClassifiedLinks> for ExportedLinks {
    fn from(links: &ClassifiedLinks) -> Self {
        Self {
            important: links.important.clone(),
            navigation: links.navigation.clone(),
            external: links.external.clone(),
            social: links.social.clone(),
            download: links.download.clone(),
        }
    }
}

impl From<&PageResult> for ExportedContent {
    fn from(page: &PageResult) -> Self {
        Self {
            cleaned_text: page.cleaned_content.clone(),
            word_count: page.word_count,
            quality_score: page.quality_score,
            extraction_method: page.extraction_method.clone(),
        }
    }
}

/// Build the structured export: exactly one page uses the single-page
/// layout, anything else the multi-page layout.
pub fn create_structured_export(pages: &[PageResult]) -> StructuredExport {
    match pages {
        [page] => single_page(page),
        _ => multi_page(pages),
    }
}

fn single_page(page: &PageResult) -> StructuredExport {
    StructuredExport {
        metadata: ExportMetadata {
            scraped_at: Utc::now(),
            total_pages: 1,
            successful_pages: usize::from(page.success),
            failed_pages: None,
            export_format: EXPORT_FORMAT.to_string(),
        },
        summary: None,
        pages: vec![ExportedPage {
            url: page.url.clone(),
            title: page.title.clone(),
            description: page.description.clone(),
            content: Some(page.into()),
            links: Some((&page.links).into()),
            success: page.success,
            error: page.error.clone(),
        }],
    }
}

fn multi_page(pages: &[PageResult]) -> StructuredExport {
    let successful: Vec<&PageResult> = pages.iter().filter(|p| p.success).collect();

    let average_quality_score = if successful.is_empty() {
        0.0
    } else {
        successful.iter().map(|p| f64::from(p.quality_score)).sum::<f64>() / successful.len() as f64
    };

    let unique_domains = pages
        .iter()
        .map(|p| host_of(&p.url).unwrap_or_default())
        .collect::<HashSet<_>>()
        .len();

    let summary = ExportSummary {
        total_word_count: successful.iter().map(|p| p.word_count).sum(),
        average_quality_score,
        unique_domains,
        total_important_links: successful.iter().map(|p| p.links.important.len()).sum(),
    };

    let exported = pages
        .iter()
        .map(|page| {
            let mut exported = ExportedPage {
                url: page.url.clone(),
                title: page.title.clone(),
                description: page.description.clone(),
                content: None,
                links: None,
                success: page.success,
                error: None,
            };
            if page.success {
                exported.content = Some(page.into());
                exported.links = Some((&page.links).into());
            } else {
                exported.error = Some(
                    page.error
                        .clone()
                        .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                );
            }
            exported
        })
        .collect();

    StructuredExport {
        metadata: ExportMetadata {
            scraped_at: Utc::now(),
            total_pages: pages.len(),
            successful_pages: successful.len(),
            failed_pages: Some(pages.len() - successful.len()),
            export_format: EXPORT_FORMAT.to_string(),
        },
        summary: Some(summary),
        pages: exported,
    }
}
