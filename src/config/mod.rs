//! Configuration module for Exam-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! including the catalog of role targets to crawl.
//!
//! # Example
//!
//! ```no_run
//! use exam_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config/pciconcursos.toml")).unwrap();
//! println!("Catalog has {} targets", config.targets.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, CrawlerConfig, ExtractionConfig, OutputConfig, RetryConfig,
    TargetEntry, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
