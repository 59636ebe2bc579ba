use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed relation set (§3 Graph edge). Symmetric for
/// `{entity_link, thematic, supports}`, asymmetric for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    EntityLink,
    Causal,
    Temporal,
    Thematic,
    Contradicts,
    Supports,
    DerivedFrom,
    Supersedes,
}

/// A typed, weighted, possibly-symmetric edge between two memory-graph
/// nodes (§3 Graph edge). Nodes are referenced by opaque string id so the
/// graph store never needs to know which kind of memory (semantic,
/// episode, procedure, schema) a node represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    pub relation_type: RelationType,
    pub strength: f64,
    pub traversal_count: u64,
    pub last_traversed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GraphEdge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, relation_type: RelationType, strength: f64) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation_type,
            strength: strength.clamp(crate::constants::EDGE_STRENGTH_FLOOR, 1.0),
            traversal_count: 0,
            last_traversed_at: None,
            created_at: Utc::now(),
        }
    }
}
