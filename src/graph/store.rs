//! Query adapter over the concept snapshot.
//!
//! The traversal engine only ever needs two operations — find a node by
//! lexical key and list its weighted edges — expressed by the
//! [`GraphQuery`] trait. [`ConceptStore`] is the SQLite implementation;
//! every query goes through [`rusqlite::Connection::prepare_cached`] and
//! bound parameters, so the core never constructs query text.

use rusqlite::{params, Connection};

use crate::db::converters::{row_to_edge, row_to_node_hit};
use crate::db::schema::initialize_database;
use crate::error::Result;
use crate::types::{Edge, NodeHit};

// ---------------------------------------------------------------------------
// GraphQuery
// ---------------------------------------------------------------------------

/// The two-operation query surface the traversal engine consumes.
pub trait GraphQuery {
    /// Exact-match lookup of concept nodes for a lexical key. An empty
    /// result is a valid "not found" signal, never an error.
    fn find_node(&self, lexical_key: &str) -> Result<Vec<NodeHit>>;

    /// All edges incident to `node_id` (as either endpoint) with weight
    /// strictly greater than `min_weight`. An empty result is a valid leaf
    /// signal.
    fn edges_of(&self, node_id: i64, min_weight: f64) -> Result<Vec<Edge>>;
}

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

const FIND_NODE_SQL: &str = "\
SELECT id, uri FROM nodes WHERE uri = ?1";

const EDGES_OF_SQL: &str = "\
SELECT id, uri, relation_id, start_id, end_id, weight
FROM edges
WHERE (start_id = ?1 AND weight > ?2) OR (end_id = ?1 AND weight > ?2)";

const INSERT_NODE_SQL: &str = "\
INSERT INTO nodes (id, uri) VALUES (?1, ?2)
ON CONFLICT(id) DO UPDATE SET uri = excluded.uri";

const INSERT_EDGE_SQL: &str = "\
INSERT INTO edges (id, uri, relation_id, start_id, end_id, weight)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT(id) DO UPDATE SET
  uri = excluded.uri,
  relation_id = excluded.relation_id,
  start_id = excluded.start_id,
  end_id = excluded.end_id,
  weight = excluded.weight";

// ---------------------------------------------------------------------------
// ConceptStore
// ---------------------------------------------------------------------------

/// SQLite-backed concept snapshot.
pub struct ConceptStore {
    pub conn: Connection,
}

impl std::fmt::Debug for ConceptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConceptStore").finish_non_exhaustive()
    }
}

impl ConceptStore {
    /// Open a snapshot at `path`, creating the schema when absent.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self {
            conn: initialize_database(path)?,
        })
    }

    /// Ephemeral in-memory snapshot, used by tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Wrap an existing connection (schema must already be applied).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Insert or replace a node row.
    pub fn upsert_node(&self, id: i64, uri: &str) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_NODE_SQL)?;
        stmt.execute(params![id, uri])?;
        Ok(())
    }

    /// Insert or replace an edge row.
    pub fn upsert_edge(&self, edge: &Edge) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(INSERT_EDGE_SQL)?;
        stmt.execute(params![
            edge.id,
            edge.label,
            edge.relation_id,
            edge.start_id,
            edge.end_id,
            edge.weight
        ])?;
        Ok(())
    }

    /// Node and edge counts, logged after ingestion.
    pub fn counts(&self) -> Result<(usize, usize)> {
        let nodes: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        let edges: usize =
            self.conn
                .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?;
        Ok((nodes, edges))
    }
}

impl GraphQuery for ConceptStore {
    fn find_node(&self, lexical_key: &str) -> Result<Vec<NodeHit>> {
        let mut stmt = self.conn.prepare_cached(FIND_NODE_SQL)?;
        let rows = stmt.query_map(params![lexical_key], row_to_node_hit)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    fn edges_of(&self, node_id: i64, min_weight: f64) -> Result<Vec<Edge>> {
        let mut stmt = self.conn.prepare_cached(EDGES_OF_SQL)?;
        let rows = stmt.query_map(params![node_id, min_weight], row_to_edge)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
