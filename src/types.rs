//! Core data types: concept keys, depth vectors, categories, and the
//! edge/node shapes returned by the graph store.

use serde::{Deserialize, Serialize};

/// Number of depth slots carried per concept. Slot 0 is reserved for
/// directly-supplied keywords; traversal writes slots 1 and up.
pub const DEPTH_SLOTS: usize = 10;

// ---------------------------------------------------------------------------
// ConceptKey
// ---------------------------------------------------------------------------

/// A normalized lexical identifier for a graph node.
///
/// Keys come out of composite edge labels with occasional artifacts (a
/// trailing `]` from the label wrapper) and out of node URIs that may or
/// may not carry the trailing separator. Normalization strips a trailing
/// bracket and guarantees exactly one trailing `/`, so textual variants of
/// the same concept always collapse to one entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptKey(String);

impl ConceptKey {
    /// Normalize a raw URI or label fragment into a canonical key.
    /// Idempotent: normalizing an already-normalized key is a no-op.
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.strip_suffix(']').unwrap_or(raw);
        if trimmed.ends_with('/') {
            Self(trimmed.to_string())
        } else {
            Self(format!("{trimmed}/"))
        }
    }

    /// Wrap a bare document token into the graph's lexical-key form.
    pub fn from_word(word: &str) -> Self {
        Self(format!("/c/en/{word}/"))
    }

    /// The node-table URI for a bare word. Node URIs carry no trailing
    /// separator, unlike normalized keys.
    pub fn lexical_uri(word: &str) -> String {
        format!("/c/en/{word}")
    }

    /// The bare word segment of a `/c/en/<word>/...` key, used to look the
    /// concept back up in the node table during extension.
    pub fn base_word(&self) -> &str {
        self.0.split('/').nth(3).unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConceptKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// DepthVector
// ---------------------------------------------------------------------------

/// Per-concept tally of occurrences at each traversal depth within one
/// category. Slot `d` holds the count of times the concept was reached `d`
/// edge-hops out from a training keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepthVector([u32; DEPTH_SLOTS]);

impl DepthVector {
    /// Add one occurrence at `depth`. Construction-phase mutation path.
    pub fn increment(&mut self, depth: usize) {
        self.0[depth] += 1;
    }

    /// Overwrite slot `depth` with an explicit count. Extension-phase
    /// mutation path; last write wins.
    pub fn set(&mut self, depth: usize, count: u32) {
        self.0[depth] = count;
    }

    pub fn get(&self, depth: usize) -> u32 {
        self.0[depth]
    }

    /// Sum across all slots.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&v| u64::from(v)).sum()
    }

    pub fn slots(&self) -> &[u32; DEPTH_SLOTS] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The fixed set of document categories, codes 1..=12.
///
/// Declaration order is the canonical scan order for arg-max tie breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Admin,
    Maintenance,
    Clerical,
    Communications,
    Community,
    Engineering,
    Finance,
    Health,
    Technology,
    Legal,
    Policy,
    PublicSafety,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Admin,
        Category::Maintenance,
        Category::Clerical,
        Category::Communications,
        Category::Community,
        Category::Engineering,
        Category::Finance,
        Category::Health,
        Category::Technology,
        Category::Legal,
        Category::Policy,
        Category::PublicSafety,
    ];

    /// Numeric code as used in dataset CSV rows (1-based).
    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_code(code: i64) -> crate::error::Result<Self> {
        match code {
            1..=12 => Ok(Self::ALL[(code - 1) as usize]),
            other => Err(crate::error::TailGraphError::UnknownCategory(other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Admin => "admin",
            Category::Maintenance => "maintenance",
            Category::Clerical => "clerical",
            Category::Communications => "communications",
            Category::Community => "community",
            Category::Engineering => "engineering",
            Category::Finance => "finance",
            Category::Health => "health",
            Category::Technology => "technology",
            Category::Legal => "legal",
            Category::Policy => "policy",
            Category::PublicSafety => "public_safety",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Graph store row shapes
// ---------------------------------------------------------------------------

/// A node match from `find_node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHit {
    pub id: i64,
    pub uri: String,
}

/// A weighted edge as returned by `edges_of`.
///
/// The composite label decomposes into comma-separated fields; fields 1 and
/// 2 carry the start-side and end-side concept labels in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: i64,
    pub label: String,
    pub relation_id: i64,
    pub start_id: i64,
    pub end_id: i64,
    pub weight: f64,
}

impl Edge {
    /// Resolve the far side of this edge relative to `current`: the other
    /// endpoint's node id and the embedded concept label on that side.
    ///
    /// When `current` equals the start node the walk advances to the end
    /// node and records the end-side label; symmetric otherwise.
    pub fn resolve(&self, current: i64) -> (i64, &str) {
        let fields: Vec<&str> = self.label.split(',').collect();
        if current == self.start_id {
            (self.end_id, fields.get(2).copied().unwrap_or(&self.label))
        } else {
            (self.start_id, fields.get(1).copied().unwrap_or(&self.label))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_bracket_and_appends_separator() {
        assert_eq!(ConceptKey::normalize("/c/en/apple]").as_str(), "/c/en/apple/");
        assert_eq!(ConceptKey::normalize("/c/en/apple").as_str(), "/c/en/apple/");
        assert_eq!(ConceptKey::normalize("/c/en/apple/").as_str(), "/c/en/apple/");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = ConceptKey::normalize("/c/en/apple]");
        let twice = ConceptKey::normalize(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn variants_collapse_to_same_key() {
        let a = ConceptKey::normalize("/c/en/dog");
        let b = ConceptKey::normalize("/c/en/dog/");
        let c = ConceptKey::normalize("/c/en/dog]");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn base_word_extracts_the_english_segment() {
        assert_eq!(ConceptKey::from_word("engineer").base_word(), "engineer");
        assert_eq!(ConceptKey::normalize("/c/en/law/n/").base_word(), "law");
    }

    #[test]
    fn category_codes_round_trip() {
        for cat in Category::ALL {
            assert_eq!(Category::from_code(i64::from(cat.code())).unwrap(), cat);
        }
        assert!(Category::from_code(0).is_err());
        assert!(Category::from_code(13).is_err());
    }

    #[test]
    fn edge_resolution_is_symmetric() {
        let edge = Edge {
            id: 7,
            label: "[/r/RelatedTo/,/c/en/cat/,/c/en/dog/,...]".to_string(),
            relation_id: 1,
            start_id: 10,
            end_id: 20,
            weight: 5.0,
        };
        let (other, label) = edge.resolve(10);
        assert_eq!(other, 20);
        assert_eq!(label, "/c/en/dog/");
        let (other, label) = edge.resolve(20);
        assert_eq!(other, 10);
        assert_eq!(label, "/c/en/cat/");
    }

    #[test]
    fn depth_vector_total_sums_all_slots() {
        let mut dv = DepthVector::default();
        dv.increment(0);
        dv.increment(0);
        dv.set(3, 40);
        assert_eq!(dv.get(0), 2);
        assert_eq!(dv.get(3), 40);
        assert_eq!(dv.total(), 42);
    }
}
