//! Crawl-frontier selection from classified links

use std::collections::HashSet;

use super::types::{ClassifiedLinks, Link};

/// Navigation links taken into the frontier
const MAX_NAVIGATION: usize = 10;
/// Important links taken into the frontier
const MAX_IMPORTANT: usize = 5;
/// Content links taken into the frontier
const MAX_CONTENT: usize = 5;

/// Ordered, deduplicated list of URLs worth crawling next.
///
/// Takes up to 10 navigation links, then up to 5 important links, then up to
/// 5 content links, keeps the first occurrence of each URL and truncates the
/// result to `max_links`.
pub fn get_crawlable_links(links: &ClassifiedLinks, max_links: usize) -> Vec<String> {
    let head = |list: &[Link], n: usize| {
        list.iter()
            .take(n)
            .map(|l| l.url.clone())
            .collect::<Vec<_>>()
    };

    let mut seen = HashSet::new();
    head(&links.navigation, MAX_NAVIGATION)
        .into_iter()
        .chain(head(&links.important, MAX_IMPORTANT))
        .chain(head(&links.content, MAX_CONTENT))
        .filter(|url| seen.insert(url.clone()))
        .take(max_links)
        .collect()
}
