//! Page fetcher abstraction and HTTP implementation
//!
//! This module handles navigation to listing and detail pages, including:
//! - The `PageFetcher` trait the crawl is written against
//! - Wait strategies for engines that render pages
//! - Building HTTP clients with proper user agent strings
//! - Error classification for failed page loads

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How long a navigation waits before the page counts as loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Return as soon as the document is parsed; used for listing pages
    DomContentLoaded,

    /// Wait until the network goes quiet; used for detail pages whose
    /// download links may load late
    NetworkIdle,
}

/// A page that finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Final URL after redirects; relative links resolve against it
    pub url: Url,

    /// Document markup
    pub html: String,
}

impl LoadedPage {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }
}

/// Errors that can occur while loading a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url} after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Navigates to pages and exposes the page currently loaded
///
/// Extraction runs against `current_page` after a successful `navigate`.
/// A failed navigation clears the current page.
#[async_trait]
pub trait PageFetcher: Send {
    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitStrategy,
        timeout: Duration,
    ) -> Result<(), FetchError>;

    fn current_page(&self) -> Option<&LoadedPage>;
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are set per request by the fetcher, not on the client.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages with plain HTTP GET requests
///
/// The server-rendered document is complete once the response body is read,
/// so both wait strategies resolve the same way here.
pub struct HttpPageFetcher {
    client: Client,
    current: Option<LoadedPage>,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn navigate(
        &mut self,
        url: &str,
        wait: WaitStrategy,
        timeout: Duration,
    ) -> Result<(), FetchError> {
        self.current = None;

        let target = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        tracing::trace!("GET {} ({:?}, timeout {:?})", url, wait, timeout);

        let response = self
            .client
            .get(target)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| classify_error(url, timeout, e))?;

        self.current = Some(LoadedPage::new(final_url, html));
        Ok(())
    }

    fn current_page(&self) -> Option<&LoadedPage> {
        self.current.as_ref()
    }
}

fn classify_error(url: &str, timeout: Duration, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
