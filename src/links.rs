//! # Link Discovery Module
//!
//! Finds the hyperlinks of a page, sorts them into categories and decides
//! which of them feed the crawl frontier.
//!
//! ## Key Components
//!
//! - `normalize_url`: resolves hrefs to `scheme://host/path[?query]`
//! - `LinkClassifier` / `classify_links`: navigation, content, footer,
//!   external, important, social and download buckets with priorities
//! - `get_crawlable_links`: the traversal order the crawler relies on
//!
//! Links are deduplicated by normalized URL within a category; the same URL
//! may show up in several categories.

mod classifier;
mod frontier;
mod normalize;
mod types;

pub use classifier::{LinkClassifier, classify_links, link_priority};
pub use frontier::get_crawlable_links;
pub use normalize::{authority, host_of, is_crawlable_url, normalize_url};
pub use types::{ClassifiedLinks, ExternalKind, Link, LinkCategory, LinkSummary};
