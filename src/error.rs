//! Crate-wide error type and `Result` alias.

use crate::types::Category;

/// Errors produced anywhere in the tailgraph pipeline.
///
/// Graph store failures (`Sqlite`) are fatal to the current run — a
/// traversal interrupted mid-walk leaves the visited set and partial
/// tallies inconsistent, so no recovery is attempted.
#[derive(Debug, thiserror::Error)]
pub enum TailGraphError {
    /// Underlying SQLite error from the concept snapshot.
    #[error("graph store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem error while reading/writing datasets or snapshots.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Model snapshot (de)serialization failure.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// A category accumulated zero total tally; its probability
    /// distribution is undefined and must not silently become NaN.
    #[error("category {0} has zero accumulated mass; cannot normalize probabilities")]
    DegenerateCategory(Category),

    /// A category code outside 1..=12 appeared in a dataset row.
    #[error("unknown category code {0}")]
    UnknownCategory(i64),

    /// A dataset row could not be parsed.
    #[error("malformed dataset row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TailGraphError>;
