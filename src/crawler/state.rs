//! Per-run crawl state

use crate::links::{authority, is_crawlable_url};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Visited set and frontier of a single crawl run.
///
/// Owned by one run. `visited` only grows and never exceeds `page_budget`;
/// every frontier entry passed the same-domain and extension filter.
#[derive(Debug, Clone)]
pub struct CrawlState {
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    queued: HashSet<String>,
    page_budget: usize,
    base_domain: String,
}

impl CrawlState {
    /// State for a run seeded at `seed`, `None` when the seed has no host
    pub fn new(seed: &Url, page_budget: usize) -> Option<Self> {
        Some(Self {
            visited: HashSet::new(),
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            page_budget,
            base_domain: authority(seed)?,
        })
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn budget_exhausted(&self) -> bool {
        self.visited.len() >= self.page_budget
    }

    /// Record a completed fetch, successful or not. Returns `false` when the
    /// URL was already recorded or the budget is spent.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        if self.budget_exhausted() || self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    /// Append URLs to the tail of the frontier in order. URLs that are
    /// off-domain, not crawlable, visited or already queued are skipped.
    /// Returns how many were added.
    pub fn enqueue<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            let url = url.into();
            if !is_crawlable_url(&url, &self.base_domain)
                || self.visited.contains(&url)
                || self.queued.contains(&url)
            {
                continue;
            }
            self.queued.insert(url.clone());
            self.frontier.push_back(url);
            added += 1;
        }
        added
    }

    /// Next frontier URL that has not been visited yet
    pub fn next_url(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            if !self.visited.contains(&url) {
                return Some(url);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(budget: usize) -> CrawlState {
        CrawlState::new(&Url::parse("https://example.com/").unwrap(), budget).unwrap()
    }

    #[test]
    fn test_enqueue_filters() {
        let mut state = state(5);
        let added = state.enqueue([
            "https://example.com/a",
            "https://other.com/b",
            "https://example.com/report.pdf",
            "https://example.com/a",
            "mailto:x@example.com",
        ]);
        assert_eq!(added, 1);
        assert_eq!(state.frontier_len(), 1);
        assert_eq!(state.base_domain(), "example.com");
    }

    #[test]
    fn test_visited_never_exceeds_budget() {
        let mut state = state(2);
        assert!(state.mark_visited("https://example.com/"));
        assert!(!state.mark_visited("https://example.com/"));
        assert!(state.mark_visited("https://example.com/a"));
        assert!(state.budget_exhausted());
        assert!(!state.mark_visited("https://example.com/b"));
        assert_eq!(state.visited_count(), 2);
    }

    #[test]
    fn test_next_url_skips_visited() {
        let mut state = state(5);
        state.enqueue(["https://example.com/a", "https://example.com/b"]);
        state.mark_visited("https://example.com/a");
        assert_eq!(state.next_url().as_deref(), Some("https://example.com/b"));
        assert_eq!(state.next_url(), None);
    }

    #[test]
    fn test_visited_urls_are_not_requeued() {
        let mut state = state(5);
        state.mark_visited("https://example.com/");
        assert_eq!(state.enqueue(["https://example.com/"]), 0);
    }
}
