//! Error types for the scraping pipeline and the title classifier.
//!
//! Fetch and parse failures abort a multi-page scrape. A page that is merely
//! missing optional markup (scores, authors, comment counts) is not an error
//! and never surfaces here.

use thiserror::Error;

/// Failures surfaced by [`crate::scrapers::hackernews::Scraper::get_news`].
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The HTTP request itself failed (connection, timeout, body read).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("fetching {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The fetched body could not be turned into a document tree.
    #[error("failed to parse page {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("page count must be at least 1")]
    InvalidPageCount,

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ScrapeError {
    /// True for the failures that come from the fetch collaborator.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScrapeError::Fetch { .. } | ScrapeError::Status { .. })
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Failures from fitting or querying a [`crate::bayes::NaiveBayesClassifier`].
#[derive(Error, Debug, PartialEq)]
pub enum ClassifierError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("got {titles} titles but {labels} labels")]
    LengthMismatch { titles: usize, labels: usize },

    #[error("classifier has not been fitted")]
    NotFitted,

    #[error("smoothing parameter alpha must be positive, got {0}")]
    InvalidAlpha(f64),
}
