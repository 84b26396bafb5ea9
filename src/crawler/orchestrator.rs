use super::{
    CrawlError, CrawlProgress, CrawlReport, CrawlState, CrawlerConfig, FetchedPage, PageFetcher,
    PageResult, ResultsStore,
};
use crate::cleaner::clean_content;
use crate::export::create_structured_export;
use crate::extractor::ContentExtractor;
use crate::links::{classify_links, get_crawlable_links, normalize_url};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use url::Url;

/// Crawls one site at a time, one page at a time
pub struct Crawler {
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    extractor: ContentExtractor,
    progress: Option<mpsc::Sender<CrawlProgress>>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            config,
            fetcher,
            extractor: ContentExtractor::new(),
            progress: None,
        }
    }

    /// Use a preconfigured extractor, e.g. one with a text transformer
    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Send progress events to `sender` while crawling
    pub fn with_progress(mut self, sender: mpsc::Sender<CrawlProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    async fn report(&self, event: CrawlProgress) {
        if let Some(sender) = &self.progress {
            // A dropped receiver only means nobody is watching
            let _ = sender.send(event).await;
        }
    }

    /// Fetch and process a single URL. Never fails: fetch errors become a
    /// failed `PageResult`.
    #[instrument(skip(self))]
    pub async fn scrape_page(&self, url: &str) -> PageResult {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping malformed URL: {}", e);
                return PageResult::failed(url, e);
            }
        };

        match self.fetcher.fetch(&parsed).await {
            Ok(page) => self.process(url, page).await,
            Err(e) => {
                warn!("Failed to fetch page: {}", e);
                PageResult::failed(url, e)
            }
        }
    }

    /// Extract, clean and classify a fetched page
    async fn process(&self, url: &str, page: FetchedPage) -> PageResult {
        let extraction = self
            .extractor
            .extract_with_instructions(&page.html, url, self.config.custom_instructions.as_deref())
            .await;
        let cleaned = clean_content(&extraction.candidate.text);
        let links = classify_links(&page.html, page.final_url.as_str());

        info!(
            url,
            words = cleaned.word_count,
            quality = cleaned.quality_score,
            method = %extraction.candidate.source_label,
            "Scraped page"
        );

        PageResult {
            url: url.to_string(),
            title: extraction.candidate.title,
            description: extraction.candidate.description,
            content: extraction.candidate.text,
            cleaned_content: cleaned.cleaned_text,
            word_count: cleaned.word_count,
            quality_score: cleaned.quality_score,
            extraction_score: extraction.quality_score,
            extraction_method: extraction.candidate.source_label,
            links,
            cleaning_steps: cleaned.steps,
            custom_instructions_applied: extraction.instructions_applied,
            success: true,
            error: None,
            scraped_at: Utc::now(),
        }
    }

    /// Crawl from `seed` until the frontier is empty or the page budget is
    /// spent.
    ///
    /// The seed is fetched first. Its crawlable links seed the frontier in
    /// navigation, important, content order, and links found on later pages
    /// are appended behind them. Consecutive fetches are separated by the
    /// configured politeness delay.
    #[instrument(skip(self), fields(budget = self.config.max_pages))]
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let seed_url = Url::parse(seed).map_err(|_| CrawlError::InvalidSeed(seed.to_string()))?;
        if !matches!(seed_url.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidSeed(seed.to_string()));
        }
        let seed_key = normalize_url(seed, seed).unwrap_or_else(|| seed_url.to_string());

        let page_budget = self.config.max_pages.max(1);
        let mut state = CrawlState::new(&seed_url, page_budget)
            .ok_or_else(|| CrawlError::InvalidSeed(seed.to_string()))?;

        info!("Starting crawl of {} ({} pages max)", seed_key, page_budget);
        self.report(CrawlProgress::Started {
            seed: seed_key.clone(),
            page_budget,
        })
        .await;

        self.report(CrawlProgress::Fetching {
            url: seed_key.clone(),
        })
        .await;
        let seed_page = self
            .fetcher
            .fetch(&seed_url)
            .instrument(info_span!("fetch_seed"))
            .await
            .map_err(|source| CrawlError::SeedFetch {
                url: seed_key.clone(),
                source,
            })?;
        state.mark_visited(&seed_key);

        let seed_result = self.process(&seed_key, seed_page).await;
        self.page_done(&seed_result).await;
        let added = state.enqueue(get_crawlable_links(
            &seed_result.links,
            self.config.frontier_limit,
        ));
        self.frontier_grew(added, &state).await;

        let mut pages = vec![seed_result];

        while !state.budget_exhausted() {
            let Some(url) = state.next_url() else {
                debug!("Frontier exhausted");
                break;
            };

            tokio::time::sleep(self.config.politeness_delay()).await;

            info!(
                "Crawling page {}/{}: {}",
                state.visited_count() + 1,
                page_budget,
                url
            );
            self.report(CrawlProgress::Fetching { url: url.clone() }).await;
            let result = self.scrape_page(&url).await;
            state.mark_visited(&url);
            self.page_done(&result).await;

            if self.config.follow_discovered && result.success {
                let added =
                    state.enqueue(get_crawlable_links(&result.links, self.config.frontier_limit));
                self.frontier_grew(added, &state).await;
            }

            pages.push(result);
        }

        let successful = pages.iter().filter(|p| p.success).count();
        info!(
            "Crawl finished: {} pages, {} successful",
            pages.len(),
            successful
        );

        let results_path = if self.config.save_results {
            let export = create_structured_export(&pages);
            let path = ResultsStore::new(&self.config.output_dir)
                .save(&seed_key, &export)
                .await?;
            info!("Saved crawl results to {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(CrawlReport {
            seed: seed_key,
            pages,
            results_path,
        })
    }

    async fn page_done(&self, page: &PageResult) {
        self.report(CrawlProgress::PageDone {
            url: page.url.clone(),
            success: page.success,
            word_count: page.word_count,
        })
        .await;
    }

    async fn frontier_grew(&self, added: usize, state: &CrawlState) {
        if added > 0 {
            debug!(added, frontier = state.frontier_len(), "Frontier grew");
            self.report(CrawlProgress::FrontierGrew {
                added,
                frontier_len: state.frontier_len(),
            })
            .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchError;
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;
    use std::time::Duration;

    const BODY: &str = "This introduction describes the example site and the way its pages are organised for readers. \
First, every section explains one topic in plain language with short sentences. \
Second, the examples show how each feature is used in practice by real teams. \
Finally, it is important to note that the guide is updated every month with new material.";

    fn page(nav: &[&str]) -> String {
        let links: String = nav
            .iter()
            .map(|href| format!(r#"<li><a href="{href}">Section {href}</a></li>"#))
            .collect();
        format!(
            "<html><head><title>Example site page</title></head><body>\
<nav><ul>{links}</ul></nav><article><h1>Example site page</h1><p>{BODY}</p></article></body></html>"
        )
    }

    #[derive(Default)]
    struct MockFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn with_page(mut self, url: &str, html: String) -> Self {
            self.pages.insert(url.to_string(), html);
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            let html = self
                .pages
                .get(url.as_str())
                .cloned()
                .ok_or(FetchError::Status(404))?;
            Ok(FetchedPage {
                final_url: url.clone(),
                status_code: 200,
                html,
                metadata: BTreeMap::new(),
            })
        }
    }

    fn config(max_pages: usize) -> CrawlerConfig {
        CrawlerConfig::builder()
            .max_pages(max_pages)
            .politeness_delay_ms(0)
            .save_results(false)
            .build()
    }

    fn site() -> MockFetcher {
        MockFetcher::default()
            .with_page("https://example.com/", page(&["/a", "/b", "https://other.com/x"]))
            .with_page("https://example.com/a", page(&["/c"]))
            .with_page("https://example.com/c", page(&[]))
    }

    #[tokio::test]
    async fn test_budget_of_one_fetches_only_seed() {
        let fetcher = Arc::new(site());
        let crawler = Crawler::new(config(1), fetcher.clone());

        let report = crawler.crawl("https://example.com/").await.unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(fetcher.requests(), vec!["https://example.com/"]);
        assert!(report.pages[0].success);
        assert!(report.pages[0].word_count > 0);
    }

    #[tokio::test]
    async fn test_failed_page_is_recorded_and_crawl_continues() {
        let fetcher = Arc::new(site());
        let crawler = Crawler::new(config(10), fetcher.clone());

        let report = crawler.crawl("https://example.com/").await.unwrap();

        let urls: Vec<_> = report.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
            ]
        );
        let failed = &report.pages[2];
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("HTTP status 404"));
        assert_eq!(report.successful_pages(), 3);
        assert!(!fetcher.requests().iter().any(|u| u.contains("other.com")));
    }

    #[tokio::test]
    async fn test_budget_counts_failed_pages() {
        let fetcher = Arc::new(site());
        let crawler = Crawler::new(config(3), fetcher.clone());

        let report = crawler.crawl("https://example.com/").await.unwrap();

        assert_eq!(report.pages.len(), 3);
        assert_eq!(fetcher.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_politeness_delay_separates_fetches() {
        let fetcher = Arc::new(site());
        let config = CrawlerConfig::builder()
            .max_pages(3)
            .politeness_delay_ms(500)
            .save_results(false)
            .build();
        let crawler = Crawler::new(config, fetcher.clone());

        let start = tokio::time::Instant::now();
        let report = crawler.crawl("https://example.com/").await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(report.pages.len(), 3);
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
        assert_eq!(
            fetcher.requests(),
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[tokio::test]
    async fn test_discovered_links_not_followed_when_disabled() {
        let fetcher = Arc::new(site());
        let config = CrawlerConfig::builder()
            .max_pages(10)
            .politeness_delay_ms(0)
            .follow_discovered(false)
            .save_results(false)
            .build();
        let crawler = Crawler::new(config, fetcher.clone());

        let report = crawler.crawl("https://example.com/").await.unwrap();

        assert_eq!(report.pages.len(), 3);
        assert!(!fetcher.requests().contains(&"https://example.com/c".to_string()));
    }

    #[tokio::test]
    async fn test_seed_failure_is_run_error() {
        let crawler = Crawler::new(config(5), Arc::new(MockFetcher::default()));

        let err = crawler.crawl("https://example.com/").await.unwrap_err();

        assert!(matches!(err, CrawlError::SeedFetch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_seed() {
        let crawler = Crawler::new(config(5), Arc::new(MockFetcher::default()));

        assert!(matches!(
            crawler.crawl("not a url").await,
            Err(CrawlError::InvalidSeed(_))
        ));
        assert!(matches!(
            crawler.crawl("ftp://example.com/").await,
            Err(CrawlError::InvalidSeed(_))
        ));
    }

    #[tokio::test]
    async fn test_progress_events() {
        let (tx, mut rx) = mpsc::channel(32);
        let crawler = Crawler::new(config(1), Arc::new(site())).with_progress(tx);

        crawler.crawl("https://example.com/").await.unwrap();
        drop(crawler);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(
            events.first(),
            Some(&CrawlProgress::Started {
                seed: "https://example.com/".into(),
                page_budget: 1
            })
        );
        assert!(events.iter().any(|e| matches!(
            e,
            CrawlProgress::PageDone { success: true, .. }
        )));
    }

    #[tokio::test]
    async fn test_results_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let config = CrawlerConfig::builder()
            .max_pages(1)
            .politeness_delay_ms(0)
            .output_dir(dir.path())
            .build();
        let crawler = Crawler::new(config, Arc::new(site()));

        let report = crawler.crawl("https://example.com/").await.unwrap();

        let path = report.results_path.unwrap();
        assert!(path.starts_with(dir.path()));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["metadata"]["total_pages"], 1);
    }
}
