//! SQLite schema for the concept snapshot.
//!
//! Mirrors the two-table shape of the upstream knowledge-graph dump:
//! `nodes(id, uri)` and `edges(id, uri, relation_id, start_id, end_id,
//! weight)`, where the edge `uri` is the composite label embedding both
//! endpoint concepts.

use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// DDL constants — kept as separate strings so each statement can be
// executed individually for clearer error reporting.
// ---------------------------------------------------------------------------

const CREATE_NODES: &str = "\
CREATE TABLE IF NOT EXISTS nodes (
  id INTEGER PRIMARY KEY,
  uri TEXT NOT NULL
)";

const CREATE_EDGES: &str = "\
CREATE TABLE IF NOT EXISTS edges (
  id INTEGER PRIMARY KEY,
  uri TEXT NOT NULL,
  relation_id INTEGER NOT NULL,
  start_id INTEGER NOT NULL,
  end_id INTEGER NOT NULL,
  weight REAL NOT NULL,
  FOREIGN KEY (start_id) REFERENCES nodes(id),
  FOREIGN KEY (end_id) REFERENCES nodes(id)
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_nodes_uri ON nodes(uri)",
    "CREATE INDEX IF NOT EXISTS idx_edges_start ON edges(start_id)",
    "CREATE INDEX IF NOT EXISTS idx_edges_end ON edges(end_id)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) a snapshot database at `path` and apply the schema.
/// Pass `":memory:"` for an ephemeral store in tests.
pub fn initialize_database(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)?;
    apply_schema(&conn)?;
    Ok(conn)
}

/// Apply the schema to an existing connection. Idempotent.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
    conn.execute(CREATE_NODES, [])?;
    conn.execute(CREATE_EDGES, [])?;
    for ddl in CREATE_INDEXES {
        conn.execute(ddl, [])?;
    }
    Ok(())
}
