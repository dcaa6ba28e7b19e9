//! HTML parsers for listing and detail pages
//!
//! The crawl only talks to the `ListingPageParser` and `DetailPageParser`
//! traits. The default implementations understand the exam archive's markup:
//! - listing pages: one table row per exam, first row is the header
//! - detail pages: download anchors pointing at document files

use crate::config::ExtractionConfig;
use crate::crawler::fetcher::LoadedPage;
use crate::storage::ExamReference;
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Turns a loaded listing page into exam references
pub trait ListingPageParser: Send + Sync {
    /// `source_category` is recorded on every reference produced
    fn parse_listing(&self, page: &LoadedPage, source_category: &str) -> Vec<ExamReference>;
}

/// Turns a loaded detail page into absolute, deduplicated document URLs
pub trait DetailPageParser: Send + Sync {
    fn parse_detail(&self, page: &LoadedPage) -> Vec<String>;
}

/// Listing parser for `<table>` based role pages
///
/// # Column layout
///
/// | # | Content |
/// |---|---------|
/// | 1 | link to the detail page, text is the position |
/// | 2 | year |
/// | 3 | link whose text is the agency |
/// | 4 | link whose text is the organizer |
/// | 5 | education level |
///
/// Rows without a link in the first cell are skipped. Missing columns 2-5
/// become empty strings.
#[derive(Debug, Clone, Default)]
pub struct TableListingParser;

impl ListingPageParser for TableListingParser {
    fn parse_listing(&self, page: &LoadedPage, source_category: &str) -> Vec<ExamReference> {
        let document = Html::parse_document(&page.html);
        let (Ok(row_selector), Ok(link_selector)) =
            (Selector::parse("table tr"), Selector::parse("a"))
        else {
            return Vec::new();
        };

        let mut references = Vec::new();

        // First row is the header
        for row in document.select(&row_selector).skip(1) {
            let cells: Vec<ElementRef> = row
                .children()
                .filter_map(ElementRef::wrap)
                .collect();

            let cell = |index: usize| {
                cells
                    .get(index)
                    .copied()
                    .filter(|element| element.value().name() == "td")
            };

            let Some(link) = cell(0).and_then(|first| first.select(&link_selector).next()) else {
                continue;
            };

            let Some(detail_url) = link
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, &page.url))
            else {
                continue;
            };

            let linked_text = |index: usize| {
                cell(index)
                    .and_then(|c| c.select(&link_selector).next())
                    .map(element_text)
                    .unwrap_or_default()
            };

            references.push(ExamReference {
                position: element_text(link),
                agency: linked_text(2),
                year: cell(1).map(element_text).unwrap_or_default(),
                organizer: linked_text(3),
                level: cell(4).map(element_text).unwrap_or_default(),
                detail_url,
                source_category: source_category.to_string(),
            });
        }

        references
    }
}

/// Detail parser collecting document links
///
/// First pass keeps anchors whose text contains the download marker and
/// whose href contains the document marker. When that finds nothing, every
/// anchor whose href contains the document marker is kept.
#[derive(Debug, Clone)]
pub struct DownloadLinkParser {
    download_marker: String,
    document_marker: String,
}

impl DownloadLinkParser {
    pub fn new(download_marker: impl Into<String>, document_marker: impl Into<String>) -> Self {
        Self {
            download_marker: download_marker.into(),
            document_marker: document_marker.into(),
        }
    }
}

impl Default for DownloadLinkParser {
    fn default() -> Self {
        Self::from(&ExtractionConfig::default())
    }
}

impl From<&ExtractionConfig> for DownloadLinkParser {
    fn from(config: &ExtractionConfig) -> Self {
        Self::new(
            config.download_marker.clone(),
            config.document_marker.clone(),
        )
    }
}

impl DetailPageParser for DownloadLinkParser {
    fn parse_detail(&self, page: &LoadedPage) -> Vec<String> {
        let document = Html::parse_document(&page.html);
        let Ok(anchor_selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        let anchors: Vec<(String, &str)> = document
            .select(&anchor_selector)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                href.contains(&self.document_marker)
                    .then(|| (a.text().collect::<String>(), href))
            })
            .collect();

        let labelled: Vec<&str> = anchors
            .iter()
            .filter(|(text, _)| text.contains(&self.download_marker))
            .map(|(_, href)| *href)
            .collect();

        let hrefs = if labelled.is_empty() {
            anchors.iter().map(|(_, href)| *href).collect()
        } else {
            labelled
        };

        let mut seen = HashSet::new();
        hrefs
            .into_iter()
            .filter_map(|href| resolve_link(href, &page.url))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }
}

/// Text content of an element with surrounding whitespace removed
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
