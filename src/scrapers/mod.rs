//! Listing page scrapers and the collaborators they are built on.
//!
//! A scrape is a loop over three steps:
//!
//! 1. **Fetching**: a [`PageFetcher`] turns a URL into a raw page body
//! 2. **Parsing**: a [`DocumentParser`] turns the body into an [`Html`] tree
//! 3. **Extraction**: the site module pulls story records and the next-page
//!    link out of the tree
//!
//! The fetcher and parser are traits so the traversal logic can be driven by
//! canned pages in tests. [`HttpFetcher`] and [`HtmlParser`] are the
//! production implementations.
//!
//! # Supported Sources
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | Hacker News | [`hackernews`] | HTML scraping of listing pages |

use crate::error::{ScrapeError, ScrapeResult};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub mod hackernews;

/// Retrieves the raw body of a page.
pub trait PageFetcher {
    /// Fetch `url` and return its body as text.
    ///
    /// Network failures and non-success statuses are both errors.
    async fn fetch(&self, url: &str) -> ScrapeResult<String>;
}

/// Builds a queryable document tree from a page body.
pub trait DocumentParser {
    /// Parse `body`, which was fetched from `url`.
    fn parse(&self, url: &str, body: &str) -> ScrapeResult<Html>;
}

/// [`PageFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher that identifies itself with `user_agent` and gives up
    /// on any single request after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> ScrapeResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ScrapeError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Listing page returned non-success status");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        })?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// [`DocumentParser`] backed by the `scraper` HTML5 parser.
///
/// The HTML5 algorithm recovers from any markup error, so the only body
/// rejected here is one with no content at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl DocumentParser for HtmlParser {
    fn parse(&self, url: &str, body: &str) -> ScrapeResult<Html> {
        if body.trim().is_empty() {
            return Err(ScrapeError::Parse {
                url: url.to_string(),
                reason: "empty document".to_string(),
            });
        }

        let document = Html::parse_document(body);
        if !document.errors.is_empty() {
            debug!(%url, count = document.errors.len(), "Recovered from markup errors");
        }
        Ok(document)
    }
}
