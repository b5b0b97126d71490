//! Classification layer: kernel-density probability models, the
//! log-likelihood classifier, and evaluation reporting.

pub mod classifier;
pub mod kde;
pub mod report;

pub use classifier::{Classifier, Prediction};
pub use report::ClassificationReport;
