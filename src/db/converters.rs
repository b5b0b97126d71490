//! Row-to-struct converters for the snapshot tables.

use rusqlite::Row;

use crate::types::{Edge, NodeHit};

/// Convert a `SELECT id, uri FROM nodes` row.
pub fn row_to_node_hit(row: &Row<'_>) -> rusqlite::Result<NodeHit> {
    Ok(NodeHit {
        id: row.get("id")?,
        uri: row.get("uri")?,
    })
}

/// Convert a `SELECT id, uri, relation_id, start_id, end_id, weight FROM
/// edges` row.
pub fn row_to_edge(row: &Row<'_>) -> rusqlite::Result<Edge> {
    Ok(Edge {
        id: row.get("id")?,
        label: row.get("uri")?,
        relation_id: row.get("relation_id")?,
        start_id: row.get("start_id")?,
        end_id: row.get("end_id")?,
        weight: row.get("weight")?,
    })
}
