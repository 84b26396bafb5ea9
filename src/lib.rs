//! # Harvester - website crawling and article extraction
//!
//! Crawls a site from a seed URL, picks the article content of every page
//! with several competing extraction strategies, strips web boilerplate
//! from it and classifies the page's links.
//!
//! ## Features
//!
//! - Multi-strategy content extraction with quality scoring
//! - Six-stage cleaning pipeline with a final quality score
//! - Link classification (navigation, content, footer, external,
//!   important, social, download) and crawl-frontier selection
//! - Single-domain crawling with a page budget and politeness delay
//! - Structured JSON and CSV exports
//! - Optional rewriting of extracted content through Gemini
//!
//! ## Example
//!
//! ```rust,no_run
//! use harvester::crawler::{Crawler, CrawlerConfig, HttpFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CrawlerConfig::builder().max_pages(3).build();
//!     let fetcher = Arc::new(HttpFetcher::new(config.fetch_config())?);
//!
//!     let report = Crawler::new(config, fetcher)
//!         .crawl("https://example.com/")
//!         .await?;
//!
//!     for page in &report.pages {
//!         println!("{} - {} words", page.url, page.word_count);
//!     }
//!     Ok(())
//! }
//! ```

mod dom;
mod error;

pub mod cleaner;
pub mod crawler;
pub mod export;
pub mod extractor;
pub mod gemini;
pub mod links;

pub use error::{Error, Result};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
