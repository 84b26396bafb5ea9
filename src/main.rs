//! # Harvester CLI
//!
//! Command-line front end for the harvester crate.
//!
//! - `crawl`: crawl a site from a seed URL and save the structured results
//! - `scrape`: extract, clean and classify a single page
//! - `clean`: run the cleaning pipeline over a text file or stdin
//! - `links`: classify the links of one page and show its crawl frontier
//!
//! Logs go to stderr (`RUST_LOG`, default `info`), optionally to a file and
//! to an OTLP collector.

mod telemetry;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use harvester::cleaner::{clean_content, extract_key_information};
use harvester::crawler::{CrawlProgress, Crawler, CrawlerConfig, HttpFetcher, PageFetcher};
use harvester::export::{create_structured_export, to_csv, to_json};
use harvester::extractor::{ContentExtractor, DEFAULT_MODEL, GeminiTransformer};
use harvester::links::{classify_links, get_crawlable_links};
use indicatif::{ProgressBar, ProgressStyle};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use telemetry::TelemetryOptions;
use tokio::io::AsyncReadExt as _;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "Crawl websites and extract clean article content", long_about = None)]
struct Cli {
    /// Export spans and metrics over OTLP (also enabled by OTEL_EXPORTER_OTLP_ENDPOINT)
    #[arg(long, global = true)]
    otel: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a website starting from a seed URL
    Crawl(CrawlArgs),

    /// Scrape a single page
    Scrape(ScrapeArgs),

    /// Clean text from a file or stdin
    Clean(CleanArgs),

    /// Show the classified links of a page
    Links(LinksArgs),
}

#[derive(Args, Debug)]
struct HookArgs {
    /// Natural-language instructions applied to the extracted content
    #[arg(short, long)]
    instructions: Option<String>,

    /// Gemini model used for the instructions
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum text-generation requests per minute
    #[arg(long, default_value = "30")]
    rpm: u32,
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL
    #[arg(required = true)]
    url: String,

    /// Maximum number of pages to fetch, seed included
    #[arg(short = 'p', long, default_value = "5")]
    max_pages: usize,

    /// Delay between requests in milliseconds
    #[arg(short, long, default_value = "2000")]
    delay: u64,

    /// Directory for the JSON results file
    #[arg(short, long, default_value = "crawl_results")]
    output: PathBuf,

    /// Also write a CSV export to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Do not write the JSON results file
    #[arg(long)]
    no_save: bool,

    /// Only follow links found on the seed page
    #[arg(long)]
    no_follow: bool,

    /// Request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout: u64,

    #[command(flatten)]
    hook: HookArgs,
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Page URL
    #[arg(required = true)]
    url: String,

    /// Output format (json|csv)
    #[arg(short, long, default_value = "json", value_parser = ["json", "csv"])]
    format: String,

    /// Write the output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    hook: HookArgs,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Text file to clean, stdin when omitted
    file: Option<PathBuf>,

    /// Also extract key information
    #[arg(short, long)]
    key_info: bool,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct LinksArgs {
    /// Page URL
    #[arg(required = true)]
    url: String,

    /// Maximum number of frontier links to show
    #[arg(short = 'n', long, default_value = "20")]
    max: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(&TelemetryOptions {
        otel: cli.otel,
        log_file: cli.log_file.clone(),
    })?;

    match cli.command {
        Some(Commands::Crawl(args)) => crawl_command(args).await?,
        Some(Commands::Scrape(args)) => scrape_command(args).await?,
        Some(Commands::Clean(args)) => clean_command(args).await?,
        Some(Commands::Links(args)) => links_command(args).await?,
        None => {
            let _ = Cli::parse_from(["harvester", "--help"]);
        }
    }

    Ok(())
}

/// Extractor with the Gemini hook attached when instructions are given.
/// A missing API key only disables the hook.
fn build_extractor(hook: &HookArgs) -> ContentExtractor {
    let extractor = ContentExtractor::new();
    if hook.instructions.is_none() {
        return extractor;
    }

    let rpm = NonZeroU32::new(hook.rpm).unwrap_or(NonZeroU32::MIN);
    match GeminiTransformer::from_env(hook.model.clone(), rpm) {
        Ok(transformer) => extractor.with_transformer(Arc::new(transformer)),
        Err(e) => {
            warn!("Custom instructions disabled: {}", e);
            extractor
        }
    }
}

async fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Saved output to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Wait for the progress reporter, logging a panic or cancellation.
/// Returns whether it ran to completion.
async fn finish_progress(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress reporting task failed: {}", e);
            false
        }
    }
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .max_pages(args.max_pages)
        .politeness_delay_ms(args.delay)
        .request_timeout_secs(args.timeout)
        .follow_discovered(!args.no_follow)
        .custom_instructions(args.hook.instructions.clone())
        .output_dir(&args.output)
        .save_results(!args.no_save)
        .build();

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.fetch_config())?);
    let (progress_sender, mut progress_receiver) = mpsc::channel(100);
    let crawler = Crawler::new(config, fetcher)
        .with_extractor(build_extractor(&args.hook))
        .with_progress(progress_sender);

    let progress_bar = ProgressBar::new(args.max_pages.max(1) as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message(format!("Crawling {}...", args.url));

    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(event) = progress_receiver.recv().await {
                match event {
                    CrawlProgress::Fetching { url } => progress_bar.set_message(url),
                    CrawlProgress::PageDone {
                        url,
                        success,
                        word_count,
                    } => {
                        progress_bar.inc(1);
                        if success {
                            progress_bar.set_message(format!("{url}: {word_count} words"));
                        } else {
                            progress_bar.set_message(format!("{url}: failed"));
                        }
                    }
                    CrawlProgress::Started { .. } | CrawlProgress::FrontierGrew { .. } => {}
                }
            }
            progress_bar.finish_with_message("Crawl completed");
        }
    });

    let result = crawler.crawl(&args.url).await;
    // Dropping the crawler closes the progress channel
    drop(crawler);
    finish_progress(progress_handle).await;
    let report = result?;

    println!(
        "Crawled {} pages ({} successful, {} failed)",
        report.pages.len(),
        report.successful_pages(),
        report.failed_pages()
    );
    for page in &report.pages {
        match &page.error {
            None => println!(
                "  {} - {} words, quality {} ({})",
                page.url, page.word_count, page.quality_score, page.extraction_method
            ),
            Some(error) => println!("  {} - failed: {}", page.url, error),
        }
    }

    if let Some(path) = &report.results_path {
        println!("Saved crawl results to {}", path.display());
    }

    if let Some(path) = &args.csv {
        let csv = to_csv(&report.pages, true)?;
        tokio::fs::write(path, csv)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Saved CSV export to {}", path.display());
    }

    Ok(())
}

#[instrument]
async fn scrape_command(args: ScrapeArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::builder()
        .max_pages(1)
        .custom_instructions(args.hook.instructions.clone())
        .save_results(false)
        .build();
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.fetch_config())?);
    let crawler = Crawler::new(config, fetcher).with_extractor(build_extractor(&args.hook));

    let page = crawler.scrape_page(&args.url).await;
    if let Some(error) = &page.error {
        warn!("Scrape of {} failed: {}", page.url, error);
    }

    let pages = [page];
    let output = match args.format.as_str() {
        "csv" => to_csv(&pages, false)?,
        _ => to_json(&create_structured_export(&pages), true)?,
    };
    write_output(args.output.as_ref(), &output).await
}

#[instrument]
async fn clean_command(args: CleanArgs) -> anyhow::Result<()> {
    let raw = match &args.file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };

    let result = clean_content(&raw);
    let key_info = args
        .key_info
        .then(|| extract_key_information(&result.cleaned_text));

    if args.format == "json" {
        let output = serde_json::json!({
            "cleaning": result,
            "key_information": key_info,
        });
        println!("{}", to_json(&output, true)?);
        return Ok(());
    }

    println!("{}", result.cleaned_text);
    eprintln!();
    eprintln!(
        "{} words, quality {}, {:.0}% removed",
        result.word_count,
        result.quality_score,
        result.reduction_ratio * 100.0
    );
    for step in &result.steps {
        eprintln!("  {step}");
    }

    if let Some(info) = key_info {
        let sections = [
            ("Key phrases", &info.key_phrases),
            ("Headings", &info.headings),
            ("Bullet points", &info.bullet_points),
            ("Numbers and stats", &info.numbers_and_stats),
            ("Dates", &info.dates),
        ];
        for (name, items) in sections {
            if items.is_empty() {
                continue;
            }
            eprintln!("{name}:");
            for item in items {
                eprintln!("  - {item}");
            }
        }
    }

    Ok(())
}

#[instrument]
async fn links_command(args: LinksArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).with_context(|| format!("invalid URL: {}", args.url))?;
    let config = CrawlerConfig::default();
    let fetcher = HttpFetcher::new(config.fetch_config())?;
    let page = fetcher.fetch(&url).await?;

    let links = classify_links(&page.html, page.final_url.as_str());
    let frontier = get_crawlable_links(&links, args.max);
    let output = serde_json::json!({
        "url": page.final_url.as_str(),
        "summary": links.summary(),
        "links": links,
        "crawl_frontier": frontier,
    });
    println!("{}", to_json(&output, true)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_finish_progress_reports_completion() {
        let handle = tokio::spawn(async {});
        assert!(finish_progress(handle).await);
    }

    #[tokio::test]
    async fn test_finish_progress_survives_panicked_reporter() {
        let handle = tokio::spawn(async { panic!("progress bar went away") });
        assert!(!finish_progress(handle).await);
    }
}
