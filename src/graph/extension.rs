//! Adaptive extension pass.
//!
//! After construction, keywords that recur often enough earn extra
//! neighborhood depth: for each extension level `L`, a keyword whose
//! depth-0 tally strictly exceeds `round(exp(L / c))` has the concepts
//! exactly `L` hops out recorded with that frozen tally as an explicit
//! count. Higher levels demand exponentially more evidence, so only the
//! strongest keywords reach the deepest levels.
//!
//! Threshold checks always read the frozen input model; writes go to a
//! deep copy. Each (keyword, level) pair runs with a fresh visited set,
//! so the levels of one keyword are explored independently.

use crate::config::TrialConfig;
use crate::error::Result;
use crate::graph::store::GraphQuery;
use crate::graph::traversal::{TailWalker, VisitedSet};
use crate::model::Model;
use crate::types::ConceptKey;

/// Minimum depth-0 tally (exclusive) a keyword needs to qualify for
/// extension level `level`.
pub fn extension_threshold(level: u32, constant: f64) -> u32 {
    (f64::from(level) / constant).exp().round() as u32
}

/// Run the extension pass over `frozen`, returning the extended copy.
///
/// Keywords that have vanished from the graph since construction are
/// skipped; an extension level whose walk finds nothing simply writes
/// nothing.
pub fn extend_model<G: GraphQuery>(
    graph: &G,
    config: &TrialConfig,
    frozen: &Model,
) -> Result<Model> {
    let mut extended = frozen.clone();
    let walker = TailWalker::new(graph, config.min_edge_weight, config.tail_length);

    let thresholds: Vec<(u32, u32)> = config
        .extension_levels
        .iter()
        .map(|&level| (level, extension_threshold(level, config.threshold_constant)))
        .collect();

    for (category, concepts) in frozen.iter() {
        let mut extended_keywords = 0usize;
        for (key, depth_vector) in concepts {
            let keyword_tally = depth_vector.get(0);
            if keyword_tally == 0 {
                continue;
            }
            let mut qualified = false;
            for &(level, threshold) in &thresholds {
                if keyword_tally <= threshold {
                    continue;
                }
                qualified = true;
                extend_keyword(graph, &walker, config, category, key, keyword_tally, level, &mut extended)?;
            }
            if qualified {
                extended_keywords += 1;
            }
        }
        tracing::info!(category = %category, extended_keywords, "extension pass complete");
    }

    Ok(extended)
}

/// Extend one qualifying keyword to one target level.
///
/// The keyword's own edges are marked visited before the walk so level-`L`
/// exploration starts from its depth-1 neighbors at depth 2 and never
/// doubles back through the seed.
#[allow(clippy::too_many_arguments)]
fn extend_keyword<G: GraphQuery>(
    graph: &G,
    walker: &TailWalker<'_, G>,
    config: &TrialConfig,
    category: crate::types::Category,
    key: &ConceptKey,
    keyword_tally: u32,
    level: u32,
    extended: &mut Model,
) -> Result<()> {
    let hits = graph.find_node(&ConceptKey::lexical_uri(key.base_word()))?;
    let Some(hit) = hits.first() else {
        tracing::warn!(key = %key, "qualified keyword no longer present in graph");
        return Ok(());
    };

    let mut visited = VisitedSet::new();
    let seed_edges = graph.edges_of(hit.id, config.min_edge_weight)?;
    for edge in &seed_edges {
        visited.insert(edge.id);
    }
    for edge in &seed_edges {
        let (neighbor, _) = edge.resolve(hit.id);
        walker.extend(
            neighbor,
            category,
            2,
            level,
            keyword_tally,
            extended,
            &mut visited,
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
