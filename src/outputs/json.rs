//! JSON persistence for scrape reports and labeled corpora.
//!
//! Reports are grouped by the local date of the scrape:
//! ```text
//! output_dir/
//! └── 2021-04-01/
//!     ├── stories_081502.json
//!     └── stories_173010.json
//! ```

use crate::models::{LabeledStory, ScrapeReport, StoryRecord};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path a report taken at `at` is written to under `output_dir`.
pub fn report_path(output_dir: &str, at: &DateTime<Local>) -> PathBuf {
    PathBuf::from(output_dir)
        .join(at.format("%Y-%m-%d").to_string())
        .join(format!("stories_{}.json", at.format("%H%M%S")))
}

/// Write `report` as pretty JSON under `output_dir`, returning the file path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_report(
    report: &ScrapeReport,
    output_dir: &str,
    at: &DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(output_dir, at);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create report dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), count = report.stories.len(), "Wrote scrape report");
    Ok(path)
}

/// Load a JSON array of labeled stories.
#[instrument(level = "info")]
pub async fn read_labeled(path: &str) -> Result<Vec<LabeledStory>, Box<dyn Error>> {
    let text = fs::read_to_string(path).await?;
    let labeled: Vec<LabeledStory> = serde_json::from_str(&text)?;
    info!(count = labeled.len(), "Loaded labeled stories");
    Ok(labeled)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoriesFile {
    Report(ScrapeReport),
    Bare(Vec<StoryRecord>),
}

/// Load stories from either a scrape report or a bare JSON array of records.
#[instrument(level = "info")]
pub async fn read_stories(path: &str) -> Result<Vec<StoryRecord>, Box<dyn Error>> {
    let text = fs::read_to_string(path).await?;
    let stories = match serde_json::from_str::<StoriesFile>(&text)? {
        StoriesFile::Report(report) => report.stories,
        StoriesFile::Bare(stories) => stories,
    };
    info!(count = stories.len(), "Loaded stories");
    Ok(stories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_report() -> ScrapeReport {
        ScrapeReport {
            source: "https://news.ycombinator.com/newest".to_string(),
            scraped_at: "2021-04-01T08:15:02+00:00".to_string(),
            pages_requested: 1,
            stories: vec![StoryRecord {
                title: "Tell HN: Thanks for the Maturity".to_string(),
                url: "item?id=26660719".to_string(),
                author: Some("adenozine".to_string()),
                points: 1,
                comments: 0,
            }],
        }
    }

    #[test]
    fn test_report_path_layout() {
        let at = Local.with_ymd_and_hms(2021, 4, 1, 8, 15, 2).unwrap();
        let path = report_path("/tmp/out", &at);
        assert_eq!(path, PathBuf::from("/tmp/out/2021-04-01/stories_081502.json"));
    }

    #[tokio::test]
    async fn test_write_then_read_report() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let at = Local.with_ymd_and_hms(2021, 4, 1, 8, 15, 2).unwrap();

        let path = write_report(&sample_report(), dir, &at).await.unwrap();
        assert!(path.exists());

        let stories = read_stories(path.to_str().unwrap()).await.unwrap();
        assert_eq!(stories, sample_report().stories);
    }

    #[tokio::test]
    async fn test_read_stories_bare_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stories.json");
        std::fs::write(
            &path,
            r#"[{"title": "A", "url": "https://a.example", "author": null, "points": 0, "comments": 0}]"#,
        )
        .unwrap();

        let stories = read_stories(path.to_str().unwrap()).await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].author, None);
    }

    #[tokio::test]
    async fn test_read_labeled_rejects_missing_label() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("labeled.json");
        std::fs::write(&path, r#"[{"title": "No label here"}]"#).unwrap();

        assert!(read_labeled(path.to_str().unwrap()).await.is_err());
    }
}
