//! Snapshot ingestion: load node and edge CSV dumps into the SQLite
//! concept store.
//!
//! Node dumps are `id,uri`; edge dumps are
//! `id,uri,relation_id,start_id,end_id,weight`. The edge `uri` column is
//! the composite label and is taken as the final field of the node dump's
//! two-column split, so embedded commas inside a label cannot shift
//! fields on the node side; edge labels are bracket-wrapped and parsed
//! from the right for the numeric columns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, TailGraphError};
use crate::graph::store::ConceptStore;
use crate::types::Edge;

const NODES_HEADER: &str = "id,uri";
const EDGES_HEADER: &str = "id,uri,relation_id,start_id,end_id,weight";

fn malformed(line: usize, reason: impl Into<String>) -> TailGraphError {
    TailGraphError::MalformedRow {
        line,
        reason: reason.into(),
    }
}

/// Load a node dump into the store. Returns the number of rows loaded.
pub fn ingest_nodes(store: &ConceptStore, path: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut loaded = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line_no == 1 {
            if line.trim() != NODES_HEADER {
                return Err(malformed(line_no, format!("expected header `{NODES_HEADER}`")));
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some((id, uri)) = line.split_once(',') else {
            return Err(malformed(line_no, "expected 2 comma-separated fields"));
        };
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| malformed(line_no, format!("node id `{}` is not an integer", id.trim())))?;
        store.upsert_node(id, uri.trim())?;
        loaded += 1;
    }

    Ok(loaded)
}

/// Load an edge dump into the store. Returns the number of rows loaded.
///
/// The composite label may contain commas, so the four trailing numeric
/// columns are split off from the right.
pub fn ingest_edges(store: &ConceptStore, path: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut loaded = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line_no == 1 {
            if line.trim() != EDGES_HEADER {
                return Err(malformed(line_no, format!("expected header `{EDGES_HEADER}`")));
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let Some((id, rest)) = line.split_once(',') else {
            return Err(malformed(line_no, "expected 6 comma-separated fields"));
        };
        let mut tail = rest.rsplitn(5, ',');
        let (Some(weight), Some(end_id), Some(start_id), Some(relation_id), Some(label)) = (
            tail.next(),
            tail.next(),
            tail.next(),
            tail.next(),
            tail.next(),
        ) else {
            return Err(malformed(line_no, "expected 6 comma-separated fields"));
        };

        let parse_int = |field: &str, name: &str| -> Result<i64> {
            field
                .trim()
                .parse()
                .map_err(|_| malformed(line_no, format!("{name} `{}` is not an integer", field.trim())))
        };
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|_| malformed(line_no, format!("weight `{}` is not a number", weight.trim())))?;

        store.upsert_edge(&Edge {
            id: parse_int(id, "edge id")?,
            label: label.trim().to_string(),
            relation_id: parse_int(relation_id, "relation id")?,
            start_id: parse_int(start_id, "start id")?,
            end_id: parse_int(end_id, "end id")?,
            weight,
        })?;
        loaded += 1;
    }

    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::store::GraphQuery;

    #[test]
    fn ingests_nodes_and_edges() {
        let dir = tempfile::tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        let edges = dir.path().join("edges.csv");
        std::fs::write(&nodes, "id,uri\n1,/c/en/cat\n2,/c/en/dog\n").unwrap();
        std::fs::write(
            &edges,
            "id,uri,relation_id,start_id,end_id,weight\n\
             10,[/r/RelatedTo/,/c/en/cat/,/c/en/dog/,/d/wiktionary/],1,1,2,5.5\n",
        )
        .unwrap();

        let store = ConceptStore::in_memory().unwrap();
        assert_eq!(ingest_nodes(&store, &nodes).unwrap(), 2);
        assert_eq!(ingest_edges(&store, &edges).unwrap(), 1);

        let hits = store.find_node("/c/en/cat").unwrap();
        assert_eq!(hits.len(), 1);
        let incident = store.edges_of(hits[0].id, 4.0).unwrap();
        assert_eq!(incident.len(), 1);
        // commas inside the label survive the right-hand split
        assert_eq!(
            incident[0].label,
            "[/r/RelatedTo/,/c/en/cat/,/c/en/dog/,/d/wiktionary/]"
        );
        assert_eq!(incident[0].weight, 5.5);
    }

    #[test]
    fn node_header_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        std::fs::write(&nodes, "node_id,uri\n1,/c/en/cat\n").unwrap();

        let store = ConceptStore::in_memory().unwrap();
        let err = ingest_nodes(&store, &nodes).unwrap_err();
        assert!(matches!(err, TailGraphError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn bad_edge_weight_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let edges = dir.path().join("edges.csv");
        std::fs::write(
            &edges,
            "id,uri,relation_id,start_id,end_id,weight\n10,[label],1,1,2,heavy\n",
        )
        .unwrap();

        let store = ConceptStore::in_memory().unwrap();
        let err = ingest_edges(&store, &edges).unwrap_err();
        assert!(matches!(err, TailGraphError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn reingest_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nodes = dir.path().join("nodes.csv");
        std::fs::write(&nodes, "id,uri\n1,/c/en/cat\n").unwrap();

        let store = ConceptStore::in_memory().unwrap();
        ingest_nodes(&store, &nodes).unwrap();
        ingest_nodes(&store, &nodes).unwrap();
        let (node_count, _) = store.counts().unwrap();
        assert_eq!(node_count, 1);
    }
}
