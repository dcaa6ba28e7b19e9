use serde::Deserialize;

/// Main configuration structure for Exam-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub catalog: CatalogConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}

/// Pacing between requests
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause after every detail-page fetch (milliseconds)
    #[serde(rename = "inter-exam-delay-ms", default = "default_inter_exam_delay")]
    pub inter_exam_delay_ms: u64,

    /// Pause after every completed role target (milliseconds)
    #[serde(
        rename = "inter-target-delay-ms",
        default = "default_inter_target_delay"
    )]
    pub inter_target_delay_ms: u64,

    /// Leave exams whose detail page never loaded unresolved, so the next
    /// run visits them again. Off by default: they resolve to no documents.
    #[serde(rename = "revisit-unreachable", default)]
    pub revisit_unreachable: bool,
}

/// Page-load retry tunables
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Timeout of the first navigation attempt (milliseconds)
    #[serde(rename = "initial-timeout-ms", default = "default_initial_timeout")]
    pub initial_timeout_ms: u64,

    /// Additional attempts after the first failure
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Timeout added per retry attempt (milliseconds)
    #[serde(rename = "timeout-increment-ms", default = "default_timeout_increment")]
    pub timeout_increment_ms: u64,

    /// Constant part of the sleep before a retry (milliseconds)
    #[serde(rename = "backoff-base-ms", default = "default_backoff_base")]
    pub backoff_base_ms: u64,

    /// Per-attempt part of the sleep before a retry (milliseconds)
    #[serde(rename = "backoff-step-ms", default = "default_backoff_step")]
    pub backoff_step_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Site-specific literals used by the detail page parser
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// Visible link text that marks a download link
    #[serde(rename = "download-marker", default = "default_download_marker")]
    pub download_marker: String,

    /// Substring of an href that marks a document file
    #[serde(rename = "document-marker", default = "default_document_marker")]
    pub document_marker: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON dataset
    #[serde(rename = "dataset-path", default = "default_dataset_path")]
    pub dataset_path: String,

    /// Directory for per-category exports
    #[serde(rename = "export-dir", default = "default_export_dir")]
    pub export_dir: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

/// Where the role listing pages live
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Listing URLs are `base-url` joined with a target slug
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// One role ("cargo") in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetEntry {
    /// Path segment of the listing page (e.g. "enfermeiro")
    pub slug: String,

    /// Display name, recorded as the source category of discovered exams
    pub name: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            inter_exam_delay_ms: default_inter_exam_delay(),
            inter_target_delay_ms: default_inter_target_delay(),
            revisit_unreachable: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_timeout_ms: default_initial_timeout(),
            retries: default_retries(),
            timeout_increment_ms: default_timeout_increment(),
            backoff_base_ms: default_backoff_base(),
            backoff_step_ms: default_backoff_step(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "exam-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.org/exam-harvest".to_string(),
            contact_email: "exam-harvest@example.org".to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            download_marker: default_download_marker(),
            document_marker: default_document_marker(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            export_dir: default_export_dir(),
            summary_path: default_summary_path(),
        }
    }
}

fn default_inter_exam_delay() -> u64 {
    2_000
}

fn default_inter_target_delay() -> u64 {
    3_000
}

fn default_initial_timeout() -> u64 {
    60_000
}

fn default_retries() -> u32 {
    2
}

fn default_timeout_increment() -> u64 {
    15_000
}

fn default_backoff_base() -> u64 {
    3_000
}

fn default_backoff_step() -> u64 {
    2_000
}

fn default_download_marker() -> String {
    "Baixar".to_string()
}

fn default_document_marker() -> String {
    ".pdf".to_string()
}

fn default_dataset_path() -> String {
    "exams.json".to_string()
}

fn default_export_dir() -> String {
    "exports".to_string()
}

fn default_summary_path() -> String {
    "summary.md".to_string()
}
