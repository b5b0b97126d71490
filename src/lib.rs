//! tailgraph — knowledge-graph word-association classifier.
//!
//! Builds per-category concept models by bounded-depth traversal of a
//! ConceptNet-style semantic graph from training keywords, selectively
//! deepens the neighborhoods of high-frequency keywords, normalizes the
//! tallies with a Gaussian kernel density estimate, and classifies
//! keyword documents by summed log-likelihood.
//!
//! Pipeline phases, each also exposed as a CLI subcommand:
//! 1. `ingest` — load a node/edge dump into the SQLite snapshot
//! 2. `split` — shuffle a labeled dataset into k train/test folds
//! 3. `build` — traverse from every training keyword, tally by depth
//! 4. `extend` — threshold-driven deepening of strong keywords
//! 5. `classify` — KDE normalization and arg-max prediction

pub mod classify;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod graph;
pub mod model;
pub mod observability;
pub mod types;

pub use config::TrialConfig;
pub use error::{Result, TailGraphError};
pub use model::Model;
pub use types::{Category, ConceptKey, DepthVector};
