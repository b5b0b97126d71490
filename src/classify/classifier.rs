//! Log-likelihood classifier over per-category probability models.

use std::collections::BTreeMap;

use crate::classify::kde::{self, Distribution};
use crate::config::TrialConfig;
use crate::error::Result;
use crate::model::Model;
use crate::types::{Category, ConceptKey};

/// One classification outcome: the winning category plus the full score
/// and miss breakdown used to reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub category: Category,
    pub log_likelihoods: BTreeMap<Category, f64>,
    pub misses: BTreeMap<Category, usize>,
}

/// Frozen classifier: the KDE distributions of every category plus the
/// floor probability charged for unknown tokens.
#[derive(Debug, Clone)]
pub struct Classifier {
    distributions: BTreeMap<Category, Distribution>,
    floor_log: f64,
}

impl Classifier {
    /// Normalize every category of `model` into a probability
    /// distribution.
    ///
    /// A single degenerate category (recorded concepts, zero
    /// kernel-covered mass) fails construction of the whole classifier;
    /// the error names the offending category. Empty categories are fine
    /// and simply miss every token.
    pub fn from_model(model: &Model, config: &TrialConfig) -> Result<Self> {
        let mut distributions = BTreeMap::new();
        for category in Category::ALL {
            distributions.insert(
                category,
                kde::category_probabilities(model, category, config.bandwidth)?,
            );
        }
        Ok(Self {
            distributions,
            floor_log: config.floor_probability.ln(),
        })
    }

    /// Classify a bag of tokens.
    ///
    /// Each category's score is the sum of log probabilities of the
    /// tokens under that category; a token absent from a category is
    /// charged the floor and counted as a miss there. Ties go to the
    /// earliest category in canonical order.
    pub fn classify<'t>(&self, tokens: impl IntoIterator<Item = &'t str>) -> Prediction {
        let keys: Vec<ConceptKey> = tokens.into_iter().map(ConceptKey::from_word).collect();

        let mut log_likelihoods = BTreeMap::new();
        let mut misses = BTreeMap::new();
        for category in Category::ALL {
            let dist = &self.distributions[&category];
            let mut score = 0.0;
            let mut missed = 0usize;
            for key in &keys {
                match dist.get(key) {
                    Some(p) => score += p.ln(),
                    None => {
                        score += self.floor_log;
                        missed += 1;
                    }
                }
            }
            log_likelihoods.insert(category, score);
            misses.insert(category, missed);
        }

        let mut best = Category::ALL[0];
        let mut best_score = log_likelihoods[&best];
        for category in &Category::ALL[1..] {
            let score = log_likelihoods[category];
            if score > best_score {
                best = *category;
                best_score = score;
            }
        }

        Prediction {
            category: best,
            log_likelihoods,
            misses,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
