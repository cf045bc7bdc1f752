//! Multinomial Naive Bayes over story titles.
//!
//! Titles are cleaned and split into words with [`crate::utils::tokenize`].
//! Each label keeps a document count (for the prior) and per-word counts
//! (for the likelihood). Likelihoods use additive smoothing:
//!
//! ```text
//! P(w | label) = (count(w, label) + alpha) / (total_words(label) + alpha * |V|)
//! ```
//!
//! Words never seen during training are ignored at prediction time. All
//! tables are `BTreeMap`s, so predictions are reproducible and ties go to
//! the label that sorts first.

use crate::error::ClassifierError;
use crate::utils::{tokenize, truncate_for_log};
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Default)]
struct LabelStats {
    documents: usize,
    total_words: usize,
    word_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
struct Model {
    documents: usize,
    vocabulary: BTreeSet<String>,
    labels: BTreeMap<String, LabelStats>,
}

/// Title classifier. Construct with [`NaiveBayesClassifier::new`], then
/// [`fit`](NaiveBayesClassifier::fit) before predicting.
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    alpha: f64,
    model: Option<Model>,
}

impl NaiveBayesClassifier {
    /// Create an unfitted classifier with smoothing parameter `alpha`.
    pub fn new(alpha: f64) -> Result<Self, ClassifierError> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(ClassifierError::InvalidAlpha(alpha));
        }
        Ok(Self { alpha, model: None })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Labels seen during training, in sorted order. Empty before `fit`.
    pub fn labels(&self) -> Vec<&str> {
        self.model
            .as_ref()
            .map(|m| m.labels.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Train on `titles[i]` labeled `labels[i]`, replacing any previous fit.
    #[instrument(level = "info", skip_all, fields(titles = titles.len()))]
    pub fn fit<T, L>(&mut self, titles: &[T], labels: &[L]) -> Result<(), ClassifierError>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        if titles.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                titles: titles.len(),
                labels: labels.len(),
            });
        }
        if titles.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut vocabulary = BTreeSet::new();
        let mut stats: BTreeMap<String, LabelStats> = BTreeMap::new();

        for (title, label) in titles.iter().zip(labels) {
            let entry = stats.entry(label.as_ref().to_string()).or_default();
            entry.documents += 1;

            for (word, count) in tokenize(title.as_ref()).into_iter().counts() {
                entry.total_words += count;
                *entry.word_counts.entry(word.clone()).or_insert(0) += count;
                vocabulary.insert(word);
            }
        }

        info!(
            labels = stats.len(),
            vocabulary = vocabulary.len(),
            "Fitted Naive Bayes model"
        );
        self.model = Some(Model {
            documents: titles.len(),
            vocabulary,
            labels: stats,
        });
        Ok(())
    }

    /// Most likely label for a single title.
    pub fn predict_one(&self, title: &str) -> Result<&str, ClassifierError> {
        let model = self.model.as_ref().ok_or(ClassifierError::NotFitted)?;
        let words = tokenize(title);
        let vocabulary_size = model.vocabulary.len() as f64;

        let mut best: Option<(&str, f64)> = None;
        for (label, stats) in &model.labels {
            let prior = (stats.documents as f64 / model.documents as f64).ln();
            let denominator = stats.total_words as f64 + self.alpha * vocabulary_size;

            let likelihood: f64 = words
                .iter()
                .filter(|w| model.vocabulary.contains(*w))
                .map(|w| {
                    let count = stats.word_counts.get(w).copied().unwrap_or(0) as f64;
                    ((count + self.alpha) / denominator).ln()
                })
                .sum();

            let score = prior + likelihood;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((label.as_str(), score));
            }
        }

        let (label, score) = best.ok_or(ClassifierError::NotFitted)?;
        debug!(title = %truncate_for_log(title, 80), %label, score, "Predicted label");
        Ok(label)
    }

    /// Predict a label for each title, in order.
    pub fn predict<T: AsRef<str>>(&self, titles: &[T]) -> Result<Vec<String>, ClassifierError> {
        titles
            .iter()
            .map(|t| self.predict_one(t.as_ref()).map(str::to_string))
            .collect()
    }

    /// Fraction of `titles` whose predicted label equals the given label.
    pub fn score<T, L>(&self, titles: &[T], labels: &[L]) -> Result<f64, ClassifierError>
    where
        T: AsRef<str>,
        L: AsRef<str>,
    {
        if titles.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                titles: titles.len(),
                labels: labels.len(),
            });
        }
        if titles.is_empty() {
            return Ok(0.0);
        }

        let predicted = self.predict(titles)?;
        let correct = predicted
            .iter()
            .zip(labels)
            .filter(|(p, l)| p.as_str() == l.as_ref())
            .count();
        Ok(correct as f64 / titles.len() as f64)
    }
}

/// Shuffle `items` with a seeded RNG and split off the last `test_ratio` of them.
///
/// Returns `(train, test)`. The test side gets at least one item whenever
/// `items` has two or more and `test_ratio > 0`.
pub fn train_test_split<T>(mut items: Vec<T>, test_ratio: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let ratio = test_ratio.clamp(0.0, 1.0);
    let mut test_len = (items.len() as f64 * ratio).round() as usize;
    if ratio > 0.0 && test_len == 0 && items.len() > 1 {
        test_len = 1;
    }
    let test = items.split_off(items.len() - test_len.min(items.len()));
    (items, test)
}
