//! Page-level extraction: navigate with retry, then parse the loaded page

use crate::crawler::catalog::RoleTarget;
use crate::crawler::fetcher::{PageFetcher, WaitStrategy};
use crate::crawler::parser::{DetailPageParser, ListingPageParser};
use crate::crawler::retry::{navigate_with_retry, RetryPolicy};
use crate::storage::ExamReference;

/// Result of visiting one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailOutcome {
    /// Every attempt failed; the page was never loaded
    Unreachable,

    /// The page loaded; the list may be empty
    Documents(Vec<String>),
}

impl DetailOutcome {
    /// Document URLs, empty when the page was unreachable
    pub fn into_documents(self) -> Vec<String> {
        match self {
            Self::Unreachable => Vec::new(),
            Self::Documents(urls) => urls,
        }
    }
}

/// Loads the listing page of `target` and returns its exam references
///
/// An unreachable listing page yields an empty list.
pub async fn extract_exam_links<F, L>(
    fetcher: &mut F,
    parser: &L,
    target: &RoleTarget,
    policy: &RetryPolicy,
) -> Vec<ExamReference>
where
    F: PageFetcher + ?Sized,
    L: ListingPageParser + ?Sized,
{
    let url = target.listing_url.as_str();

    if let Err(e) =
        navigate_with_retry(fetcher, url, WaitStrategy::DomContentLoaded, policy).await
    {
        tracing::error!("Listing page for '{}' unreachable: {}", target.name, e);
        return Vec::new();
    }

    let Some(page) = fetcher.current_page() else {
        return Vec::new();
    };

    let references = parser.parse_listing(page, &target.name);
    tracing::debug!(
        "Listing {} produced {} exam references",
        url,
        references.len()
    );
    references
}

/// Loads a detail page and returns its document URLs
///
/// An unreachable detail page yields an empty list. Use [`fetch_detail`] to
/// tell that apart from a page without documents.
pub async fn extract_document_urls<F, D>(
    fetcher: &mut F,
    parser: &D,
    detail_url: &str,
    policy: &RetryPolicy,
) -> Vec<String>
where
    F: PageFetcher + ?Sized,
    D: DetailPageParser + ?Sized,
{
    fetch_detail(fetcher, parser, detail_url, policy)
        .await
        .into_documents()
}

/// Loads a detail page, distinguishing unreachable pages from empty ones
pub async fn fetch_detail<F, D>(
    fetcher: &mut F,
    parser: &D,
    detail_url: &str,
    policy: &RetryPolicy,
) -> DetailOutcome
where
    F: PageFetcher + ?Sized,
    D: DetailPageParser + ?Sized,
{
    if let Err(e) =
        navigate_with_retry(fetcher, detail_url, WaitStrategy::NetworkIdle, policy).await
    {
        tracing::warn!("Detail page {} unreachable: {}", detail_url, e);
        return DetailOutcome::Unreachable;
    }

    match fetcher.current_page() {
        Some(page) => DetailOutcome::Documents(parser.parse_detail(page)),
        None => DetailOutcome::Unreachable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::{FetchError, LoadedPage};
    use crate::crawler::parser::{DownloadLinkParser, TableListingParser};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;
    use url::Url;

    /// Serves fixed pages; any other URL times out
    #[derive(Default)]
    struct FixedFetcher {
        pages: HashMap<String, String>,
        waits: Vec<WaitStrategy>,
        current: Option<LoadedPage>,
    }

    impl FixedFetcher {
        fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait]
    impl PageFetcher for FixedFetcher {
        async fn navigate(
            &mut self,
            url: &str,
            wait: WaitStrategy,
            timeout: Duration,
        ) -> Result<(), FetchError> {
            self.waits.push(wait);
            self.current = None;
            match self.pages.get(url) {
                Some(html) => {
                    self.current = Some(LoadedPage::new(Url::parse(url).unwrap(), html.clone()));
                    Ok(())
                }
                None => Err(FetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }),
            }
        }

        fn current_page(&self) -> Option<&LoadedPage> {
            self.current.as_ref()
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy {
            backoff_base: Duration::ZERO,
            backoff_step: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    fn target(url: &str) -> RoleTarget {
        RoleTarget::new("enfermeiro", "Enfermeiro", Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_extract_exam_links_uses_dom_content_loaded() {
        let html = r#"<table>
            <tr><th>Prova</th></tr>
            <tr><td><a href="/p/1">Enfermeiro</a></td><td>2020</td></tr>
        </table>"#;
        let mut fetcher = FixedFetcher::default().with_page("https://site/provas/enfermeiro", html);

        let refs = extract_exam_links(
            &mut fetcher,
            &TableListingParser,
            &target("https://site/provas/enfermeiro"),
            &policy(),
        )
        .await;

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].detail_url, "https://site/p/1");
        assert_eq!(refs[0].source_category, "Enfermeiro");
        assert_eq!(fetcher.waits, vec![WaitStrategy::DomContentLoaded]);
    }

    #[tokio::test]
    async fn test_unreachable_listing_is_empty_after_all_attempts() {
        let mut fetcher = FixedFetcher::default();
        let refs = extract_exam_links(
            &mut fetcher,
            &TableListingParser,
            &target("https://site/provas/enfermeiro"),
            &policy(),
        )
        .await;

        assert!(refs.is_empty());
        assert_eq!(fetcher.waits.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_detail_outcomes() {
        let mut fetcher = FixedFetcher::default()
            .with_page("https://site/p/1", r#"<a href="/files/a.pdf">Baixar</a>"#)
            .with_page("https://site/p/2", "<p>Sem arquivos</p>");
        let parser = DownloadLinkParser::default();

        let found = fetch_detail(&mut fetcher, &parser, "https://site/p/1", &policy()).await;
        assert_eq!(
            found,
            DetailOutcome::Documents(vec!["https://site/files/a.pdf".to_string()])
        );

        let empty = fetch_detail(&mut fetcher, &parser, "https://site/p/2", &policy()).await;
        assert_eq!(empty, DetailOutcome::Documents(vec![]));

        let missing = fetch_detail(&mut fetcher, &parser, "https://site/p/3", &policy()).await;
        assert_eq!(missing, DetailOutcome::Unreachable);

        assert!(fetcher.waits.iter().all(|w| *w == WaitStrategy::NetworkIdle));
    }

    #[tokio::test]
    async fn test_extract_document_urls_flattens_unreachable() {
        let mut fetcher = FixedFetcher::default();
        let urls = extract_document_urls(
            &mut fetcher,
            &DownloadLinkParser::default(),
            "https://site/p/9",
            &policy(),
        )
        .await;
        assert!(urls.is_empty());
    }
}
