//! Tail traversal engine: bounded-depth, cycle-safe walks outward from a
//! seed node.
//!
//! Two modes share the edge-resolution logic. *Accumulate mode* records
//! every newly visited concept at its depth and keeps recursing until the
//! configured maximum depth. *Extension mode* recurses silently and
//! records only concepts reached at an exact target depth, writing an
//! explicit count instead of incrementing.
//!
//! The per-run [`VisitedSet`] of edge ids is the sole termination
//! guarantee on cyclic graphs: an edge, once traversed, is never
//! traversed again within the run. Recursion depth is bounded by the
//! configured maximum (small, typically 2–5), so true recursion is safe.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::store::GraphQuery;
use crate::model::{MissLog, Model};
use crate::types::{Category, ConceptKey};

/// Edge identifiers traversed within one run. Scoped to a single training
/// row or a single extension invocation; cleared by the caller between
/// runs.
pub type VisitedSet = HashSet<i64>;

/// Bounded-depth walker over the concept graph.
pub struct TailWalker<'a, G: GraphQuery> {
    graph: &'a G,
    min_edge_weight: f64,
    tail_length: u32,
}

impl<'a, G: GraphQuery> TailWalker<'a, G> {
    pub fn new(graph: &'a G, min_edge_weight: f64, tail_length: u32) -> Self {
        Self {
            graph,
            min_edge_weight,
            tail_length,
        }
    }

    /// Seed a construction walk from one training keyword.
    ///
    /// Looks the keyword up in the graph; a missing node is recoverable —
    /// it is logged against its source document and skipped. Otherwise the
    /// keyword itself is recorded at depth 0 and the walk explores
    /// outward from depth 1.
    pub fn seed_keyword(
        &self,
        token: &str,
        doc_id: &str,
        category: Category,
        model: &mut Model,
        misses: &mut MissLog,
        visited: &mut VisitedSet,
    ) -> Result<()> {
        let hits = self.graph.find_node(&ConceptKey::lexical_uri(token))?;
        let Some(hit) = hits.first() else {
            tracing::warn!(token, doc_id, "keyword not found in concept graph");
            misses.push(token, doc_id);
            return Ok(());
        };

        model.record(category, &hit.uri, 0);
        self.accumulate(hit.id, category, 1, model, visited)
    }

    /// Accumulate mode: record every newly visited concept at `depth`,
    /// recursing until `tail_length`.
    ///
    /// An empty edge list is a normal leaf condition and ends the branch.
    pub fn accumulate(
        &self,
        node_id: i64,
        category: Category,
        depth: u32,
        model: &mut Model,
        visited: &mut VisitedSet,
    ) -> Result<()> {
        let edges = self.graph.edges_of(node_id, self.min_edge_weight)?;
        for edge in &edges {
            if !visited.insert(edge.id) {
                continue;
            }
            let (other_id, label) = edge.resolve(node_id);
            model.record(category, label, depth as usize);
            if depth < self.tail_length {
                self.accumulate(other_id, category, depth + 1, model, visited)?;
            }
        }
        Ok(())
    }

    /// Extension mode: recurse silently until `target_depth`, then record
    /// concepts at exactly that depth with an explicit `count`.
    ///
    /// Later writes for the same (category, concept, depth) overwrite
    /// earlier ones; the visited set guarantees each edge sources at most
    /// one write per run.
    pub fn extend(
        &self,
        node_id: i64,
        category: Category,
        depth: u32,
        target_depth: u32,
        count: u32,
        model: &mut Model,
        visited: &mut VisitedSet,
    ) -> Result<()> {
        let edges = self.graph.edges_of(node_id, self.min_edge_weight)?;
        for edge in &edges {
            if !visited.insert(edge.id) {
                continue;
            }
            let (other_id, label) = edge.resolve(node_id);
            if depth == target_depth {
                model.record_extended(category, label, target_depth as usize, count);
            } else {
                self.extend(
                    other_id,
                    category,
                    depth + 1,
                    target_depth,
                    count,
                    model,
                    visited,
                )?;
            }
        }
        Ok(())
    }
}

/// Construction phase: walk every keyword of every training row and
/// return the accumulated model plus the diagnostic miss log.
///
/// The visited set is cleared once per row, so keywords within one
/// document share cycle state but documents do not.
pub fn build_model<'r, G: GraphQuery>(
    graph: &G,
    min_edge_weight: f64,
    tail_length: u32,
    rows: impl IntoIterator<Item = &'r crate::dataset::DocumentRow>,
) -> Result<(Model, MissLog)> {
    let walker = TailWalker::new(graph, min_edge_weight, tail_length);
    let mut model = Model::new();
    let mut misses = MissLog::default();
    let mut visited = VisitedSet::new();

    for row in rows {
        tracing::debug!(doc_id = %row.doc_id, category = %row.category, "building signature");
        visited.clear();
        for token in row.tokens() {
            walker.seed_keyword(token, &row.doc_id, row.category, &mut model, &mut misses, &mut visited)?;
        }
    }

    Ok((model, misses))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
