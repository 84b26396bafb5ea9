//! # Crawl Orchestrator
//!
//! Drives the extractor, the cleaner and the link classifier over a seed
//! URL and the frontier of links discovered from it.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: page budget, politeness delay, fetch settings
//! - `PageFetcher`: the network layer, with `HttpFetcher` as the default
//! - `CrawlState`: visited set and frontier owned by one run
//! - `Crawler`: the per-run state machine, producing one `PageResult` per
//!   fetched URL
//! - `ResultsStore`: writes the structured export of a run to disk
//!
//! ## Failure model
//!
//! A page that fails to fetch is recorded as a failed `PageResult` and the
//! run continues. Only a failed seed fetch aborts the run.

mod config;
mod error;
mod fetcher;
mod orchestrator;
mod state;
mod storage;

pub use config::{CrawlerConfig, CrawlerConfigBuilder, FetchConfig, default_user_agent};
pub use error::{CrawlError, FetchError, StorageError};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use orchestrator::Crawler;
pub use state::CrawlState;
pub use storage::ResultsStore;

use crate::links::ClassifiedLinks;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of scraping one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub title: String,
    pub description: String,

    /// Extracted text before cleaning
    pub content: String,
    pub cleaned_content: String,
    pub word_count: usize,

    /// Final (post-cleaning) quality score
    pub quality_score: u32,

    /// Pre-cleaning score of the winning strategy
    pub extraction_score: u32,
    pub extraction_method: String,
    pub links: ClassifiedLinks,
    pub cleaning_steps: Vec<String>,
    pub custom_instructions_applied: bool,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl PageResult {
    /// Result for a URL whose fetch failed
    pub fn failed(url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            description: String::new(),
            content: String::new(),
            cleaned_content: String::new(),
            word_count: 0,
            quality_score: 0,
            extraction_score: 0,
            extraction_method: String::new(),
            links: ClassifiedLinks::default(),
            cleaning_steps: Vec::new(),
            custom_instructions_applied: false,
            success: false,
            error: Some(error.to_string()),
            scraped_at: Utc::now(),
        }
    }
}

/// Progress events emitted while a crawl runs
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlProgress {
    /// The run started with the given page budget
    Started { seed: String, page_budget: usize },
    /// A fetch is about to start
    Fetching { url: String },
    /// A page finished, successfully or not
    PageDone {
        url: String,
        success: bool,
        word_count: usize,
    },
    /// Links were added to the frontier
    FrontierGrew { added: usize, frontier_len: usize },
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,

    /// One result per fetched URL, in fetch order
    pub pages: Vec<PageResult>,

    /// Where the structured export was written, if saving was enabled
    pub results_path: Option<PathBuf>,
}

impl CrawlReport {
    pub fn successful_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.success).count()
    }

    pub fn failed_pages(&self) -> usize {
        self.pages.len() - self.successful_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_page_result() {
        let page = PageResult::failed("https://example.com/x", FetchError::Status(404));
        assert!(!page.success);
        assert_eq!(page.error.as_deref(), Some("HTTP status 404"));
        assert_eq!(page.word_count, 0);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_report_counts() {
        let mut ok = PageResult::failed("https://example.com/", "x");
        ok.success = true;
        ok.error = None;
        let report = CrawlReport {
            seed: "https://example.com/".into(),
            pages: vec![ok, PageResult::failed("https://example.com/a", "boom")],
            results_path: None,
        };
        assert_eq!(report.successful_pages(), 1);
        assert_eq!(report.failed_pages(), 1);
    }
}
