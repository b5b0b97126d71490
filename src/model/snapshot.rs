//! Model snapshot persistence.
//!
//! The logical shape — category → concept key → fixed-length integer
//! vector — is the contract; JSON is the carrier. BTreeMap keying keeps
//! snapshots byte-stable across runs.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::Result;
use crate::model::Model;

/// Write a model snapshot, replacing any existing file.
pub fn save(path: &Path, model: &Model) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, model)?;
    Ok(())
}

/// Read a model snapshot.
pub fn load(path: &Path) -> Result<Model> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let model = serde_json::from_reader(reader)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::Category;

    #[test]
    fn snapshot_round_trips() {
        let mut model = Model::new();
        model.record(Category::Technology, "/c/en/computer/", 0);
        model.record(Category::Technology, "/c/en/software/", 1);
        model.record_extended(Category::Technology, "/c/en/network/", 3, 12);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("class_words_0.json");
        save(&path, &model).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(model, loaded);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let err = load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, crate::error::TailGraphError::Io(_)));
    }
}
