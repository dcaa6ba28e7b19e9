//! Exam-Harvest: an incremental exam-archive crawler
//!
//! This crate walks the role listing pages of an exam archive, follows each
//! exam's detail page, and collects the document links it finds into a JSON
//! dataset keyed by `(position, agency, year)`. Progress is flushed after every
//! exam so an interrupted crawl resumes without repeating finished work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Exam-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid target transition: {from:?} -> {to:?}")]
    InvalidTargetTransition {
        from: state::TargetState,
        to: state::TargetState,
    },

    #[error("Invalid exam transition: {from:?} -> {to:?}")]
    InvalidExamTransition {
        from: state::ExamState,
        to: state::ExamState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid catalog target: {0}")]
    InvalidTarget(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Base URL cannot carry path segments: {0}")]
    CannotBeBase(String),
}

/// Result type alias for Exam-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{ExamState, TargetState};
pub use storage::{DocumentStatus, ExamKey, ExamRecord, ExamReference};
