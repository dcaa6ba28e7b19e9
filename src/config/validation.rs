use crate::config::types::{
    CatalogConfig, Config, ExtractionConfig, OutputConfig, RetryConfig, TargetEntry,
    UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_retry_config(&config.retry)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_extraction_config(&config.extraction)?;
    validate_output_config(&config.output)?;
    validate_catalog(&config.catalog)?;
    validate_targets(&config.targets)?;
    Ok(())
}

/// Validates retry tunables
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.initial_timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "initial_timeout_ms must be >= 1000ms, got {}ms",
            config.initial_timeout_ms
        )));
    }

    if config.retries > 10 {
        return Err(ConfigError::Validation(format!(
            "retries must be between 0 and 10, got {}",
            config.retries
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.download_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "download_marker cannot be empty".to_string(),
        ));
    }

    if config.document_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "document_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset_path cannot be empty".to_string(),
        ));
    }

    if config.export_dir.is_empty() {
        return Err(ConfigError::Validation(
            "export_dir cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_catalog(config: &CatalogConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", config.base_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' cannot be used as a base",
            config.base_url
        )));
    }

    Ok(())
}

/// Validates the catalog entries
///
/// Slugs become a single path segment of the listing URL, so they must be
/// non-empty, slash-free and unique.
fn validate_targets(targets: &[TargetEntry]) -> Result<(), ConfigError> {
    if targets.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must contain at least one [[target]]".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for target in targets {
        let slug = target.slug.trim();
        if slug.is_empty() {
            return Err(ConfigError::InvalidTarget(format!(
                "target '{}' has an empty slug",
                target.name
            )));
        }

        if slug.contains('/') || slug.contains('?') || slug.contains('#') {
            return Err(ConfigError::InvalidTarget(format!(
                "slug '{}' must be a single path segment",
                target.slug
            )));
        }

        if target.name.trim().is_empty() {
            return Err(ConfigError::InvalidTarget(format!(
                "target '{}' has an empty name",
                target.slug
            )));
        }

        if !seen.insert(slug) {
            return Err(ConfigError::InvalidTarget(format!(
                "duplicate slug '{}'",
                target.slug
            )));
        }
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
