//! Command-line interface definitions for hn_bayes.
//!
//! Options left unset on the command line fall back to the YAML config file
//! given with `--config`, then to built-in defaults.

use crate::config::Config;
use clap::{Args, Parser, Subcommand};

/// Command-line arguments for hn_bayes.
///
/// # Examples
///
/// ```sh
/// # Scrape three pages of /newest and write a dated JSON report
/// hn_bayes scrape --pages 3 --output-dir ./data
///
/// # Measure classifier accuracy on a hand-labeled corpus
/// hn_bayes train-eval --labeled ./labeled.json --test-ratio 0.3
///
/// # Label freshly scraped stories
/// hn_bayes classify --labeled ./labeled.json --input ./data/2021-04-01/stories_081502.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true, env = "HN_BAYES_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch listing pages and extract story records
    Scrape(ScrapeArgs),
    /// Train on part of a labeled corpus and report accuracy on the rest
    TrainEval(TrainEvalArgs),
    /// Train on a labeled corpus and label a file of stories
    Classify(ClassifyArgs),
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// First listing page to fetch
    #[arg(short, long)]
    pub url: Option<String>,

    /// Maximum number of pages to follow
    #[arg(short, long)]
    pub pages: Option<usize>,

    /// Directory for the JSON report; prints to stdout when omitted
    #[arg(short, long)]
    pub output_dir: Option<String>,
}

#[derive(Args, Debug)]
pub struct TrainEvalArgs {
    /// JSON array of stories with a `label` field
    #[arg(short, long)]
    pub labeled: String,

    /// Fraction of the corpus held out for testing
    #[arg(long, default_value_t = 0.3)]
    pub test_ratio: f64,

    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Additive smoothing parameter
    #[arg(long)]
    pub alpha: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// JSON array of stories with a `label` field
    #[arg(short, long)]
    pub labeled: String,

    /// Scrape report or JSON array of stories to label
    #[arg(short, long)]
    pub input: String,

    /// Additive smoothing parameter
    #[arg(long)]
    pub alpha: Option<f64>,
}

impl ScrapeArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.start_url = url.clone();
        }
        if let Some(pages) = self.pages {
            config.pages = pages;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_parsing() {
        let cli = Cli::parse_from([
            "hn_bayes",
            "scrape",
            "--pages",
            "3",
            "--output-dir",
            "./data",
        ]);

        let Command::Scrape(args) = cli.command else {
            panic!("expected scrape subcommand");
        };
        assert_eq!(args.pages, Some(3));
        assert_eq!(args.output_dir.as_deref(), Some("./data"));
        assert_eq!(args.url, None);
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "hn_bayes",
            "classify",
            "-l",
            "labeled.json",
            "-i",
            "stories.json",
            "--config",
            "config.yaml",
        ]);

        assert_eq!(cli.config.as_deref(), Some("config.yaml"));
        assert!(matches!(cli.command, Command::Classify(_)));
    }

    #[test]
    fn test_train_eval_defaults() {
        let cli = Cli::parse_from(["hn_bayes", "train-eval", "--labeled", "labeled.json"]);
        let Command::TrainEval(args) = cli.command else {
            panic!("expected train-eval subcommand");
        };
        assert_eq!(args.test_ratio, 0.3);
        assert_eq!(args.seed, 42);
        assert_eq!(args.alpha, None);
    }

    #[test]
    fn test_scrape_flags_override_config() {
        let file_config = Config {
            pages: 5,
            start_url: "https://news.ycombinator.com/news".to_string(),
            ..Config::default()
        };
        let args = ScrapeArgs {
            url: None,
            pages: Some(2),
            output_dir: None,
        };

        let config = args.apply(file_config);
        assert_eq!(config.pages, 2);
        assert_eq!(config.start_url, "https://news.ycombinator.com/news");
    }
}
