//! The categorical distribution model and its accumulator.
//!
//! A [`Model`] maps each category to its concept tallies. It is created
//! empty, mutated exclusively through [`Model::record`] during
//! construction and [`Model::record_extended`] during the extension pass,
//! and read-only afterwards. The two mutation paths never run on the same
//! instance at the same time: extension operates on a deep copy while the
//! original is kept frozen for threshold checks.

pub mod snapshot;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Category, ConceptKey, DepthVector};

/// Concept tallies for a single category.
pub type CategoryModel = BTreeMap<ConceptKey, DepthVector>;

/// Per-category word-association model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model {
    categories: BTreeMap<Category, CategoryModel>,
}

impl Model {
    /// Empty model with one (empty) concept map per category.
    pub fn new() -> Self {
        let mut categories = BTreeMap::new();
        for cat in Category::ALL {
            categories.insert(cat, CategoryModel::new());
        }
        Self { categories }
    }

    /// Record one occurrence of a concept at `depth` for `category`.
    ///
    /// The raw key is normalized first, so textual variants of the same
    /// concept never create duplicate entries. The only mutation path
    /// during construction.
    pub fn record(&mut self, category: Category, raw_key: &str, depth: usize) {
        let key = ConceptKey::normalize(raw_key);
        self.categories
            .entry(category)
            .or_default()
            .entry(key)
            .or_default()
            .increment(depth);
    }

    /// Write an explicit count at `depth` for `category`. Extension-phase
    /// mutation path; overwrites rather than increments, last write wins.
    pub fn record_extended(&mut self, category: Category, raw_key: &str, depth: usize, count: u32) {
        let key = ConceptKey::normalize(raw_key);
        self.categories
            .entry(category)
            .or_default()
            .entry(key)
            .or_default()
            .set(depth, count);
    }

    /// The concept map for one category.
    pub fn category(&self, category: Category) -> &CategoryModel {
        static EMPTY: CategoryModel = CategoryModel::new();
        self.categories.get(&category).unwrap_or(&EMPTY)
    }

    /// Depth vector for a concept within a category, if recorded.
    pub fn depth_vector(&self, category: Category, key: &ConceptKey) -> Option<&DepthVector> {
        self.categories.get(&category)?.get(key)
    }

    /// Total tally across all concepts and all depth slots of a category.
    pub fn total_mass(&self, category: Category) -> u64 {
        self.category(category).values().map(DepthVector::total).sum()
    }

    /// Number of distinct concepts recorded for a category.
    pub fn concept_count(&self, category: Category) -> usize {
        self.category(category).len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryModel)> {
        self.categories.iter().map(|(&cat, map)| (cat, map))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// MissLog
// ---------------------------------------------------------------------------

/// Diagnostic log of keywords with no matching graph node, kept for
/// post-hoc review. Never fatal.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MissLog {
    entries: Vec<MissEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissEntry {
    pub token: String,
    pub doc_id: String,
}

impl MissLog {
    pub fn push(&mut self, token: &str, doc_id: &str) {
        self.entries.push(MissEntry {
            token: token.to_string(),
            doc_id: doc_id.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MissEntry] {
        &self.entries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
