//! URL handling module for Exam-Harvest
//!
//! This module provides listing URL construction for catalog targets, link
//! resolution against the page a link was found on, and the filename folding
//! used for per-category exports.

mod resolve;
mod slug;

pub use resolve::resolve_link;
pub use slug::category_file_stem;

use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the listing page URL for a catalog slug
///
/// The base URL is treated as a directory even when it lacks a trailing
/// slash, so `https://site/provas` and `https://site/provas/` both map the
/// slug `vigia` to `https://site/provas/vigia`.
///
/// # Examples
///
/// ```
/// use exam_harvest::url::listing_url;
///
/// let url = listing_url("https://www.pciconcursos.com.br/provas/", "enfermeiro").unwrap();
/// assert_eq!(url.as_str(), "https://www.pciconcursos.com.br/provas/enfermeiro");
/// ```
pub fn listing_url(base_url: &str, slug: &str) -> UrlResult<Url> {
    let mut base = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(UrlError::InvalidScheme(base.scheme().to_string()));
    }

    if base.cannot_be_a_base() {
        return Err(UrlError::CannotBeBase(base_url.to_string()));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(slug.trim().trim_start_matches('/'))
        .map_err(|e| UrlError::Parse(e.to_string()))
}
