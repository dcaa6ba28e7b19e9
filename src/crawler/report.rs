//! Counters collected while a crawl runs

use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Targets whose listing produced exams and whose exams were all handled
    pub targets_done: u64,

    /// Targets whose listing was unreachable or had no rows
    pub targets_failed: u64,

    /// Exam references read from listing pages
    pub exams_discovered: u64,

    /// Detail pages that loaded
    pub exams_fetched: u64,

    /// Exams skipped because their documents were already resolved
    pub exams_skipped: u64,

    /// Detail pages that never loaded
    ///
    /// Their records are stored with an empty document list, or left
    /// unresolved when `revisit-unreachable` is set.
    pub exams_unreachable: u64,

    /// Document URLs recorded by this run
    pub documents_found: u64,

    /// Flushes that failed; the data is retried at the next flush
    pub flush_failures: u64,
}

impl CrawlReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            targets_done: 0,
            targets_failed: 0,
            exams_discovered: 0,
            exams_fetched: 0,
            exams_skipped: 0,
            exams_unreachable: 0,
            documents_found: 0,
            flush_failures: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration, measured up to now for an unfinished run
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Emits the summary through `tracing`
    pub fn log_summary(&self) {
        tracing::info!(
            "Crawl finished in {}s: {} targets done, {} failed",
            self.elapsed().num_seconds(),
            self.targets_done,
            self.targets_failed
        );
        tracing::info!(
            "Exams: {} discovered, {} fetched, {} skipped, {} unreachable; {} documents found",
            self.exams_discovered,
            self.exams_fetched,
            self.exams_skipped,
            self.exams_unreachable,
            self.documents_found
        );
        if self.flush_failures > 0 {
            tracing::warn!("{} dataset flushes failed during the run", self.flush_failures);
        }
    }
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::start()
    }
}
