//! Role targets the crawl visits, built from the configured catalog

use crate::config::Config;
use crate::url::listing_url;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// One role listing page to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTarget {
    pub slug: String,

    /// Display name, recorded as the source category of every exam found
    pub name: String,

    pub listing_url: Url,
}

impl RoleTarget {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, listing_url: Url) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            listing_url,
        }
    }
}

/// Builds the ordered target list from the configuration
///
/// With `only` set, just the targets whose slug is listed are kept, in
/// catalog order. An unknown slug in `only` is an error.
pub fn build_targets(config: &Config, only: &[String]) -> ConfigResult<Vec<RoleTarget>> {
    if let Some(unknown) = only
        .iter()
        .find(|slug| !config.targets.iter().any(|t| &t.slug == *slug))
    {
        return Err(ConfigError::InvalidTarget(format!(
            "'{}' is not in the catalog",
            unknown
        )));
    }

    config
        .targets
        .iter()
        .filter(|entry| only.is_empty() || only.contains(&entry.slug))
        .map(|entry| {
            let url = listing_url(&config.catalog.base_url, &entry.slug)
                .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", entry.slug, e)))?;
            Ok(RoleTarget::new(&entry.slug, &entry.name, url))
        })
        .collect()
}
