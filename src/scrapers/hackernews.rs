//! Hacker News listing page scraper.
//!
//! Listing pages (`/news`, `/newest`, `/ask`, ...) render each story as two
//! table rows: a `tr.athing` row holding the title link, followed by a row
//! whose `td.subtext` cell holds the score, submitter and comment link. Job
//! postings keep the same shape but their subtext has no score or submitter.
//!
//! The page ends with a "More" link (`a.morelink`) carrying a relative href
//! such as `newest?next=26660430&n=31`. It is absent on the last page.
//!
//! # Pairing
//!
//! Title rows and subtext cells are collected separately and paired by
//! position. When the two lists differ in length only the common prefix is
//! used.

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::StoryRecord;
use crate::scrapers::{DocumentParser, PageFetcher};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

/// Origin that relative pagination links are resolved against.
pub const BASE_URL: &str = "https://news.ycombinator.com/";

/// Default first page: the newest submissions.
pub const NEWEST_URL: &str = "https://news.ycombinator.com/newest";

static TITLE_ROW: Lazy<Selector> = Lazy::new(|| compile_selector("tr.athing"));
// Current markup wraps the link in span.titleline; older pages tag it a.storylink.
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| compile_selector("span.titleline > a, a.storylink"));
static SUBTEXT: Lazy<Selector> = Lazy::new(|| compile_selector("td.subtext"));
static SCORE: Lazy<Selector> = Lazy::new(|| compile_selector("span.score"));
static AUTHOR: Lazy<Selector> = Lazy::new(|| compile_selector("a.hnuser"));
static LINK: Lazy<Selector> = Lazy::new(|| compile_selector("a"));
static MORE_LINK: Lazy<Selector> = Lazy::new(|| compile_selector("a.morelink"));

static POINTS_RE: Lazy<Regex> = Lazy::new(|| compile_regex(r"^(\d+)\s*points?$"));
static COMMENTS_RE: Lazy<Regex> = Lazy::new(|| compile_regex(r"^(\d+)\s*comments?$"));

fn compile_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid regex {pattern:?}: {e}"))
}

/// Collapse an element's text nodes into a single trimmed string.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Title and href of one `tr.athing` row, if it has a usable title link.
fn title_of(row: ElementRef<'_>) -> Option<(String, String)> {
    let link = row.select(&TITLE_LINK).next()?;
    let title = element_text(link);
    if title.is_empty() {
        return None;
    }
    let url = link.value().attr("href").unwrap_or_default().to_string();
    Some((title, url))
}

/// Score, submitter and comment count read from one `td.subtext` cell.
#[derive(Debug, Default, PartialEq)]
struct Subtext {
    author: Option<String>,
    points: u32,
    comments: u32,
}

fn subtext_of(cell: ElementRef<'_>) -> Subtext {
    let author = cell
        .select(&AUTHOR)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty());

    let points = cell
        .select(&SCORE)
        .next()
        .and_then(|score| leading_count(&POINTS_RE, &element_text(score)))
        .unwrap_or(0);

    // "discuss" and "hide" links never match, so a fresh story reads as 0.
    let comments = cell
        .select(&LINK)
        .filter_map(|link| leading_count(&COMMENTS_RE, &element_text(link)))
        .last()
        .unwrap_or(0);

    Subtext {
        author,
        points,
        comments,
    }
}

fn leading_count(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Extract the story records of one listing page, in page order.
///
/// Rows without a score or submitter (job postings) still produce a record
/// with `points` and `comments` at 0 and no author. A title row without a
/// title link consumes its subtext cell but yields nothing.
pub fn extract_news(document: &Html) -> Vec<StoryRecord> {
    let titles = document.select(&TITLE_ROW).map(title_of);
    let subtexts = document.select(&SUBTEXT).map(subtext_of);

    titles
        .zip(subtexts)
        .filter_map(|(title, subtext)| {
            let (title, url) = title?;
            Some(StoryRecord {
                title,
                url,
                author: subtext.author,
                points: subtext.points,
                comments: subtext.comments,
            })
        })
        .collect()
}

/// Relative href of the page's "More" link, exactly as written in the markup.
pub fn extract_next_page(document: &Html) -> Option<String> {
    document
        .select(&MORE_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
}

/// Walks a listing across pages with injected fetch and parse collaborators.
#[derive(Debug)]
pub struct Scraper<F, P> {
    fetcher: F,
    parser: P,
    base_url: Url,
}

impl<F, P> Scraper<F, P>
where
    F: PageFetcher,
    P: DocumentParser,
{
    /// Create a scraper that resolves "More" links against `base_url`.
    pub fn new(fetcher: F, parser: P, base_url: Url) -> Self {
        Self {
            fetcher,
            parser,
            base_url,
        }
    }

    /// Collect stories from up to `n_pages` listing pages starting at `start_url`.
    ///
    /// Pages are fetched one after another since each page's "More" link is
    /// only known once it has been parsed. Traversal stops after `n_pages`
    /// fetches or on the first page without a "More" link, whichever comes
    /// first.
    ///
    /// # Errors
    ///
    /// The first fetch or parse failure aborts the traversal and is returned;
    /// records gathered from earlier pages are dropped. `n_pages == 0` is
    /// rejected before anything is fetched.
    #[instrument(level = "info", skip(self))]
    pub async fn get_news(&self, start_url: &str, n_pages: usize) -> ScrapeResult<Vec<StoryRecord>> {
        if n_pages == 0 {
            return Err(ScrapeError::InvalidPageCount);
        }

        let mut current_url = start_url.to_string();
        let mut results = Vec::new();
        let mut pages_fetched = 0usize;

        while pages_fetched < n_pages {
            info!(page = pages_fetched + 1, url = %current_url, "Collecting data from page");
            let body = self.fetcher.fetch(&current_url).await?;

            let wants_next = pages_fetched + 1 < n_pages;
            let (records, next_page) = self.scrape_page(&current_url, &body, wants_next)?;
            debug!(url = %current_url, count = records.len(), "Extracted stories");
            results.extend(records);
            pages_fetched += 1;

            if !wants_next {
                break;
            }
            match next_page {
                Some(next) => current_url = self.base_url.join(&next)?.to_string(),
                None => {
                    info!(pages_fetched, "Listing exhausted before page limit");
                    break;
                }
            }
        }

        info!(pages_fetched, count = results.len(), "Scrape complete");
        Ok(results)
    }

    /// Parse one page body into its records and, when asked, its next-page link.
    ///
    /// Kept synchronous so the parsed tree never lives across an await.
    fn scrape_page(
        &self,
        url: &str,
        body: &str,
        wants_next: bool,
    ) -> ScrapeResult<(Vec<StoryRecord>, Option<String>)> {
        let document = self.parser.parse(url, body)?;
        let records = extract_news(&document);
        let next_page = if wants_next {
            extract_next_page(&document)
        } else {
            None
        };
        Ok((records, next_page))
    }
}
