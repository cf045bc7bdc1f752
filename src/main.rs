//! # hn_bayes
//!
//! Scrapes Hacker News listing pages into story records and classifies
//! story titles with a Naive Bayes model trained on hand-labeled stories.
//!
//! ## Usage
//!
//! ```sh
//! hn_bayes scrape --pages 3 --output-dir ./data
//! hn_bayes train-eval --labeled ./labeled.json
//! hn_bayes classify --labeled ./labeled.json --input ./stories.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Scraping**: fetch a listing page, extract its stories, follow the
//!    "More" link, up to a page limit
//! 2. **Output**: write the records as a dated JSON report
//! 3. **Classification**: fit on labeled titles, then label new ones

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod bayes;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use bayes::{NaiveBayesClassifier, train_test_split};
use cli::{ClassifyArgs, Cli, Command, ScrapeArgs, TrainEvalArgs};
use config::Config;
use models::{LabeledStory, ScrapeReport};
use outputs::json;
use scrapers::hackernews::Scraper;
use scrapers::{HtmlParser, HttpFetcher};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = config::load_config(args.config.as_deref()).await?;

    let result = match args.command {
        Command::Scrape(scrape_args) => run_scrape(scrape_args, config).await,
        Command::TrainEval(eval_args) => run_train_eval(eval_args, config).await,
        Command::Classify(classify_args) => run_classify(classify_args, config).await,
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

async fn run_scrape(args: ScrapeArgs, config: Config) -> Result<(), Box<dyn Error>> {
    let config = args.apply(config);

    if let Some(dir) = &args.output_dir {
        ensure_writable_dir(dir).await?;
    }

    let fetcher = HttpFetcher::new(&config.user_agent, Duration::from_secs(config.timeout_secs))?;
    let base_url = Url::parse(&config.base_url)?;
    let scraper = Scraper::new(fetcher, HtmlParser, base_url);

    let stories = match scraper.get_news(&config.start_url, config.pages).await {
        Ok(stories) => stories,
        Err(e) => {
            if e.is_fetch_failure() {
                error!(url = %config.start_url, error = %e, "Listing could not be fetched");
            } else {
                error!(url = %config.start_url, error = %e, "Listing could not be scraped");
            }
            return Err(e.into());
        }
    };

    let now = Local::now();
    let report = ScrapeReport {
        source: config.start_url.clone(),
        scraped_at: now.to_rfc3339(),
        pages_requested: config.pages,
        stories,
    };

    match &args.output_dir {
        Some(dir) => {
            let path = json::write_report(&report, dir, &now).await?;
            info!(path = %path.display(), "Scrape report saved");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn split_labeled(stories: Vec<LabeledStory>) -> (Vec<String>, Vec<String>) {
    stories.into_iter().map(|s| (s.title, s.label)).unzip()
}

async fn run_train_eval(args: TrainEvalArgs, config: Config) -> Result<(), Box<dyn Error>> {
    let labeled = json::read_labeled(&args.labeled).await?;
    let (train, test) = train_test_split(labeled, args.test_ratio, args.seed);
    info!(train = train.len(), test = test.len(), seed = args.seed, "Split labeled corpus");

    let mut classifier = NaiveBayesClassifier::new(args.alpha.unwrap_or(config.alpha))?;
    let (train_titles, train_labels) = split_labeled(train);
    classifier.fit(&train_titles, &train_labels)?;

    let (test_titles, test_labels) = split_labeled(test);
    let accuracy = classifier.score(&test_titles, &test_labels)?;
    info!(accuracy, alpha = classifier.alpha(), "Evaluated classifier");

    println!(
        "accuracy: {accuracy:.4} ({} train / {} test)",
        train_titles.len(),
        test_titles.len()
    );
    Ok(())
}

async fn run_classify(args: ClassifyArgs, config: Config) -> Result<(), Box<dyn Error>> {
    let labeled = json::read_labeled(&args.labeled).await?;
    let (titles, labels) = split_labeled(labeled);

    let mut classifier = NaiveBayesClassifier::new(args.alpha.unwrap_or(config.alpha))?;
    classifier.fit(&titles, &labels)?;

    let stories = json::read_stories(&args.input).await?;
    let story_titles: Vec<&str> = stories.iter().map(|s| s.title.as_str()).collect();
    let predicted = classifier.predict(&story_titles)?;
    for (label, title) in predicted.iter().zip(&story_titles) {
        println!("{label}\t{title}");
    }
    info!(count = stories.len(), labels = ?classifier.labels(), "Classified stories");
    Ok(())
}
