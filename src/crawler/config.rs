//! # Crawler Configuration Module
//!
//! Configuration for a crawl run and for the HTTP page fetcher, built with
//! the builder pattern.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: page budget, politeness delay, frontier limits,
//!   instructions for the text-generation hook and result storage
//! - `CrawlerConfigBuilder`: builder for `CrawlerConfig`
//! - `FetchConfig`: user agent, timeout and redirect policy for `HttpFetcher`

use std::path::PathBuf;
use std::time::Duration;

/// Default user agent for page requests
pub fn default_user_agent() -> String {
    format!("harvester/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetched in one run, seed included
    pub max_pages: usize,

    /// Delay in milliseconds between consecutive fetches
    pub politeness_delay_ms: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum number of links one page may add to the frontier
    pub frontier_limit: usize,

    /// Whether links discovered on non-seed pages join the frontier
    pub follow_discovered: bool,

    /// Instruction for the text-generation hook
    pub custom_instructions: Option<String>,

    /// Directory crawl results are written to
    pub output_dir: PathBuf,

    /// Whether `crawl` writes a results file
    pub save_results: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            politeness_delay_ms: 2000,
            user_agent: default_user_agent(),
            request_timeout_secs: 30,
            frontier_limit: 20,
            follow_discovered: true,
            custom_instructions: None,
            output_dir: PathBuf::from("crawl_results"),
            save_results: true,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the page budget
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the delay in milliseconds between fetches
    pub fn politeness_delay_ms(mut self, politeness_delay_ms: u64) -> Self {
        self.config.politeness_delay_ms = politeness_delay_ms;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn request_timeout_secs(mut self, request_timeout_secs: u64) -> Self {
        self.config.request_timeout_secs = request_timeout_secs;
        self
    }

    /// Set how many links a single page may contribute to the frontier
    pub fn frontier_limit(mut self, frontier_limit: usize) -> Self {
        self.config.frontier_limit = frontier_limit;
        self
    }

    /// Set whether links found after the seed page are followed
    pub fn follow_discovered(mut self, follow_discovered: bool) -> Self {
        self.config.follow_discovered = follow_discovered;
        self
    }

    /// Set the instruction passed to the text-generation hook
    pub fn custom_instructions(mut self, instructions: Option<String>) -> Self {
        self.config.custom_instructions = instructions.filter(|i| !i.trim().is_empty());
        self
    }

    /// Set the results directory
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Set whether crawl results are written to disk
    pub fn save_results(mut self, save_results: bool) -> Self {
        self.config.save_results = save_results;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the politeness delay as a Duration
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    /// Fetcher settings derived from this configuration
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            ..FetchConfig::default()
        }
    }
}

/// Configuration for `HttpFetcher`
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlerConfig::default();
        assert_eq!(config.max_pages, 5);
        assert_eq!(config.politeness_delay(), Duration::from_secs(2));
        assert_eq!(config.frontier_limit, 20);
        assert!(config.follow_discovered);
        assert_eq!(config.output_dir, PathBuf::from("crawl_results"));
        assert!(config.user_agent.starts_with("harvester/"));
    }

    #[test]
    fn test_builder() {
        let config = CrawlerConfig::builder()
            .max_pages(12)
            .politeness_delay_ms(0)
            .user_agent("test-agent")
            .request_timeout_secs(5)
            .custom_instructions(Some("   ".to_string()))
            .save_results(false)
            .build();

        assert_eq!(config.max_pages, 12);
        assert_eq!(config.politeness_delay(), Duration::ZERO);
        assert!(config.custom_instructions.is_none());
        assert!(!config.save_results);

        let fetch = config.fetch_config();
        assert_eq!(fetch.user_agent, "test-agent");
        assert_eq!(fetch.timeout, Duration::from_secs(5));
        assert_eq!(fetch.max_redirects, 10);
    }
}
