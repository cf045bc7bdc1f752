//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so a config file only needs the keys it wants
//! to change:
//!
//! ```yaml
//! start_url: https://news.ycombinator.com/news
//! pages: 3
//! timeout_secs: 10
//! ```
//!
//! Command-line flags take precedence over file values (see [`crate::cli`]).

use crate::scrapers::hackernews::{BASE_URL, NEWEST_URL};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Origin that "More" links are resolved against.
    pub base_url: String,
    /// First listing page to fetch.
    pub start_url: String,
    /// Maximum number of listing pages per scrape.
    pub pages: usize,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Additive smoothing for the classifier.
    pub alpha: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            start_url: NEWEST_URL.to_string(),
            pages: 1,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            alpha: 1.0,
        }
    }
}

/// Parse a configuration from YAML text.
pub fn from_yaml_str(yaml: &str) -> Result<Config, serde_yaml::Error> {
    // An empty document deserializes as unit, not as an empty mapping.
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(yaml)
}

/// Load the configuration at `path`, or the defaults when `path` is `None`.
#[instrument(level = "info")]
pub async fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let yaml = tokio::fs::read_to_string(path).await?;
    let config = from_yaml_str(&yaml)?;
    info!(config_path = path, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_target_newest() {
        let config = Config::default();
        assert_eq!(config.start_url, "https://news.ycombinator.com/newest");
        assert_eq!(config.base_url, "https://news.ycombinator.com/");
        assert_eq!(config.pages, 1);
        assert!(config.user_agent.starts_with("hn_bayes/"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = from_yaml_str("pages: 4\ntimeout_secs: 5\n").unwrap();
        assert_eq!(config.pages, 4);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.start_url, NEWEST_URL);
        assert_eq!(config.alpha, 1.0);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(from_yaml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(from_yaml_str("pages: many\n").is_err());
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "start_url: https://news.ycombinator.com/news\nalpha: 0.5\n").unwrap();

        let config = load_config(path.to_str()).await.unwrap();
        assert_eq!(config.start_url, "https://news.ycombinator.com/news");
        assert_eq!(config.alpha, 0.5);
    }

    #[tokio::test]
    async fn test_load_config_without_path() {
        assert_eq!(load_config(None).await.unwrap(), Config::default());
    }
}
