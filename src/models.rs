//! Data models for scraped stories and labeled training data.
//!
//! - [`StoryRecord`]: one story row parsed from a listing page
//! - [`ScrapeReport`]: the records of one scrape run plus run metadata
//! - [`LabeledStory`]: a title with a user-assigned label, used for training

use serde::{Deserialize, Serialize};

/// One story parsed from a Hacker News listing page.
///
/// `url` is the raw `href` of the title link. Text posts (Ask HN, Tell HN)
/// link back to the site with a relative path such as `item?id=26660719`,
/// which is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoryRecord {
    /// The story headline.
    pub title: String,
    /// The story link, absolute or site-relative.
    pub url: String,
    /// Submitter name. Job postings have none.
    pub author: Option<String>,
    /// Score shown next to the story, 0 when the row has no score.
    #[serde(default)]
    pub points: u32,
    /// Number of comments, 0 when the row has none or shows "discuss".
    #[serde(default)]
    pub comments: u32,
}

/// The output of a single `scrape` run.
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeReport {
    /// URL of the first listing page.
    pub source: String,
    /// RFC 3339 timestamp of when the scrape finished.
    pub scraped_at: String,
    /// The page bound the scrape was run with.
    pub pages_requested: usize,
    /// Records in page order.
    pub stories: Vec<StoryRecord>,
}

/// A story title with a label, as produced by hand-labeling scraped records.
///
/// Other story fields (url, points, ...) are ignored, so a hand-labeled copy
/// of a scrape report's `stories` array can be loaded directly.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LabeledStory {
    pub title: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_record_serializes_missing_author_as_null() {
        let job = StoryRecord {
            title: "Acme (YC S19) Is Hiring".to_string(),
            url: "https://acme.example/jobs".to_string(),
            author: None,
            points: 0,
            comments: 0,
        };

        let json = serde_json::to_string(&job).unwrap();
        assert!(json.contains("\"author\":null"));
        assert!(json.contains("\"points\":0"));
    }

    #[test]
    fn test_story_record_defaults_counts_on_deserialize() {
        let json = r#"{"title": "Show HN: A thing", "url": "item?id=1", "author": "pg"}"#;
        let story: StoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(story.points, 0);
        assert_eq!(story.comments, 0);
        assert_eq!(story.author.as_deref(), Some("pg"));
    }

    #[test]
    fn test_labeled_story_accepts_extra_story_fields() {
        let json = r#"[
            {"title": "Rust 2.0 released", "label": "good", "url": "https://rust-lang.org", "points": 10},
            {"title": "Celebrity gossip", "label": "never"}
        ]"#;
        let labeled: Vec<LabeledStory> = serde_json::from_str(json).unwrap();
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].label, "good");
        assert_eq!(labeled[1].title, "Celebrity gossip");
    }

    #[test]
    fn test_scrape_report_round_trip() {
        let report = ScrapeReport {
            source: "https://news.ycombinator.com/newest".to_string(),
            scraped_at: "2021-04-01T12:00:00Z".to_string(),
            pages_requested: 2,
            stories: vec![],
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: ScrapeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pages_requested, 2);
        assert_eq!(back.source, report.source);
    }
}
