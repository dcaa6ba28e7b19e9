//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator walks role targets strictly in sequence:
//! - Loads each listing page and reads its exam references
//! - Skips exams whose documents are already resolved in the store
//! - Visits the detail page of every other exam and merges the result
//! - Flushes the dataset after every visited exam and after every target

use crate::config::Config;
use crate::crawler::catalog::RoleTarget;
use crate::crawler::extract::{extract_exam_links, fetch_detail, DetailOutcome};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{DetailPageParser, ListingPageParser};
use crate::crawler::report::CrawlReport;
use crate::crawler::retry::RetryPolicy;
use crate::state::{ExamState, TargetState};
use crate::storage::{DatasetStorage, ExamReference, RecordStore};
use crate::{HarvestError, Result};
use std::time::Duration;

/// Pacing and retry behaviour of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    pub retry: RetryPolicy,

    /// Pause after every visited detail page
    pub inter_exam_delay: Duration,

    /// Pause between role targets
    pub inter_target_delay: Duration,

    /// Keep exams with an unreachable detail page unresolved
    pub revisit_unreachable: bool,
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from(&config.retry),
            inter_exam_delay: Duration::from_millis(config.crawler.inter_exam_delay_ms),
            inter_target_delay: Duration::from_millis(config.crawler.inter_target_delay_ms),
            revisit_unreachable: config.crawler.revisit_unreachable,
        }
    }
}

impl CrawlSettings {
    /// Default retry counts without any sleeping
    pub fn immediate() -> Self {
        Self {
            retry: RetryPolicy {
                backoff_base: Duration::ZERO,
                backoff_step: Duration::ZERO,
                ..RetryPolicy::default()
            },
            inter_exam_delay: Duration::ZERO,
            inter_target_delay: Duration::ZERO,
            revisit_unreachable: false,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F, L, D, S>
where
    F: PageFetcher,
    L: ListingPageParser,
    D: DetailPageParser,
    S: DatasetStorage,
{
    fetcher: F,
    listing_parser: L,
    detail_parser: D,
    store: RecordStore<S>,
    settings: CrawlSettings,
}

impl<F, L, D, S> Coordinator<F, L, D, S>
where
    F: PageFetcher,
    L: ListingPageParser,
    D: DetailPageParser,
    S: DatasetStorage,
{
    pub fn new(
        fetcher: F,
        listing_parser: L,
        detail_parser: D,
        store: RecordStore<S>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            listing_parser,
            detail_parser,
            store,
            settings,
        }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_parts(self) -> (F, RecordStore<S>) {
        (self.fetcher, self.store)
    }

    /// Crawls every target in order
    ///
    /// Failures of single pages or flushes are logged and counted; the run
    /// always continues with the next item and ends with a final flush.
    pub async fn run(&mut self, targets: &[RoleTarget]) -> CrawlReport {
        let mut report = CrawlReport::start();
        tracing::info!(
            "Starting crawl of {} role targets ({} records already known)",
            targets.len(),
            self.store.len()
        );

        for (index, target) in targets.iter().enumerate() {
            tracing::info!(
                "Processing target {}/{}: {}",
                index + 1,
                targets.len(),
                target.name
            );

            match self.process_target(target, &mut report).await {
                Ok(TargetState::ExamsDone) => report.targets_done += 1,
                Ok(state) => {
                    tracing::debug!("Target '{}' ended as {}", target.name, state);
                    report.targets_failed += 1;
                }
                Err(e) => {
                    tracing::error!("Error processing target '{}': {}", target.name, e);
                    report.targets_failed += 1;
                }
            }

            if index + 1 < targets.len() {
                pause(self.settings.inter_target_delay).await;
            }
        }

        self.flush(&mut report);
        report.finish();
        report.log_summary();
        report
    }

    async fn process_target(
        &mut self,
        target: &RoleTarget,
        report: &mut CrawlReport,
    ) -> Result<TargetState> {
        let mut state = TargetState::Pending;

        let references = extract_exam_links(
            &mut self.fetcher,
            &self.listing_parser,
            target,
            &self.settings.retry,
        )
        .await;

        if references.is_empty() {
            advance_target(&mut state, TargetState::ListingFailed)?;
            tracing::warn!("No exams found for '{}', moving on", target.name);
            return Ok(state);
        }

        advance_target(&mut state, TargetState::ListingFetched)?;
        report.exams_discovered += references.len() as u64;
        tracing::info!("Found {} exams for '{}'", references.len(), target.name);

        for (index, reference) in references.iter().enumerate() {
            tracing::debug!(
                "Exam {}/{}: {}",
                index + 1,
                references.len(),
                reference.key()
            );
            self.process_exam(reference, report).await?;
        }

        // Picks up field refreshes of skipped exams
        self.flush(report);

        advance_target(&mut state, TargetState::ExamsDone)?;
        tracing::info!("Completed target '{}'", target.name);
        Ok(state)
    }

    async fn process_exam(
        &mut self,
        reference: &ExamReference,
        report: &mut CrawlReport,
    ) -> Result<ExamState> {
        let mut state = ExamState::Discovered;
        let key = reference.key();

        if self.store.is_resolved(&key) {
            self.store.upsert(reference, None);
            advance_exam(&mut state, ExamState::SkippedCached)?;
            report.exams_skipped += 1;
            tracing::debug!("Documents already known for {}", key);
            return Ok(state);
        }

        let outcome = fetch_detail(
            &mut self.fetcher,
            &self.detail_parser,
            &reference.detail_url,
            &self.settings.retry,
        )
        .await;
        advance_exam(&mut state, ExamState::DetailFetched)?;

        let documents = match outcome {
            DetailOutcome::Documents(urls) => {
                report.exams_fetched += 1;
                report.documents_found += urls.len() as u64;
                if urls.is_empty() {
                    tracing::info!("No documents found for {}", key);
                } else {
                    tracing::info!("Found {} documents for {}", urls.len(), key);
                }
                Some(urls)
            }
            DetailOutcome::Unreachable => {
                report.exams_unreachable += 1;
                if self.settings.revisit_unreachable {
                    None
                } else {
                    Some(Vec::new())
                }
            }
        };

        self.store.upsert(reference, documents);
        self.flush(report);
        advance_exam(&mut state, ExamState::Merged)?;

        pause(self.settings.inter_exam_delay).await;
        Ok(state)
    }

    /// Writes pending changes; a failure is logged and retried at the next flush
    fn flush(&mut self, report: &mut CrawlReport) {
        if let Err(e) = self.store.flush_if_dirty() {
            report.flush_failures += 1;
            tracing::error!(
                "Failed to write {}: {}; changes kept in memory",
                self.store.backend().describe(),
                e
            );
        }
    }
}

fn advance_target(state: &mut TargetState, next: TargetState) -> Result<()> {
    if !state.can_transition_to(next) {
        return Err(HarvestError::InvalidTargetTransition {
            from: *state,
            to: next,
        });
    }
    *state = next;
    Ok(())
}

fn advance_exam(state: &mut ExamState, next: ExamState) -> Result<()> {
    if !state.can_transition_to(next) {
        return Err(HarvestError::InvalidExamTransition {
            from: *state,
            to: next,
        });
    }
    *state = next;
    Ok(())
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
