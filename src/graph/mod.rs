//! Graph layer — snapshot-backed query adapter, tail traversal, and
//! adaptive extension.

pub mod extension;
pub mod ingest;
pub mod store;
pub mod traversal;
