//! Crawler module for exam discovery and document link extraction
//!
//! This module contains the core crawling logic, including:
//! - The page fetcher abstraction and its HTTP implementation
//! - Navigation retry with widening timeouts and linear backoff
//! - Listing and detail page parsers
//! - Sequential crawl coordination over the role catalog

mod catalog;
mod coordinator;
mod extract;
mod fetcher;
mod parser;
mod report;
mod retry;

pub use catalog::{build_targets, RoleTarget};
pub use coordinator::{Coordinator, CrawlSettings};
pub use extract::{extract_document_urls, extract_exam_links, fetch_detail, DetailOutcome};
pub use fetcher::{
    build_http_client, FetchError, HttpPageFetcher, LoadedPage, PageFetcher, WaitStrategy,
};
pub use parser::{DetailPageParser, DownloadLinkParser, ListingPageParser, TableListingParser};
pub use report::CrawlReport;
pub use retry::{navigate_with_retry, RetryPolicy};

use crate::config::Config;
use crate::storage::{JsonFileStorage, RecordStore};
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the catalog into role targets (optionally filtered by slug)
/// 2. Open the dataset, or start empty when `fresh` is set
/// 3. Build the HTTP fetcher
/// 4. Walk every target and its exams
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fresh` - Ignore the persisted dataset; it is overwritten at the first flush
/// * `only` - Target slugs to crawl; empty means the whole catalog
pub async fn crawl(config: &Config, fresh: bool, only: &[String]) -> Result<CrawlReport> {
    let targets = build_targets(config, only)?;

    let backend = JsonFileStorage::new(&config.output.dataset_path);
    let store = if fresh {
        tracing::info!("Fresh crawl requested, ignoring {}", config.output.dataset_path);
        RecordStore::fresh(backend)
    } else {
        RecordStore::open(backend)
    };

    let fetcher = HttpPageFetcher::from_config(&config.user_agent)?;

    let mut coordinator = Coordinator::new(
        fetcher,
        TableListingParser,
        DownloadLinkParser::from(&config.extraction),
        store,
        CrawlSettings::from(config),
    );

    Ok(coordinator.run(&targets).await)
}
