use cortex_core::constants::mention_weight;
use cortex_core::models::{CausalLink, GraphEdge, MentionType, RelationType};

/// §4.2 "Graph builder" — entity co-mention. For every pair of memories
/// that both mention `entity_id`, propose an `entity_link` edge whose
/// strength is the max of the two mention weights.
pub fn entity_link_edge(
    memory_a: &str,
    mention_a: MentionType,
    memory_b: &str,
    mention_b: MentionType,
) -> GraphEdge {
    let strength = mention_weight(mention_a).max(mention_weight(mention_b));
    GraphEdge::new(memory_a, memory_b, RelationType::EntityLink, strength)
}

/// §4.2 "On episode extraction" — each causal link produces an
/// asymmetric `causal` edge between the two memory nodes representing
/// cause and effect.
pub fn causal_edge(cause_node_id: &str, effect_node_id: &str, link: &CausalLink) -> GraphEdge {
    GraphEdge::new(cause_node_id, effect_node_id, RelationType::Causal, link.confidence)
}

/// §4.2 "On consolidation producing a semantic memory from an episode" —
/// emits `derived_from` (memory -> episode).
pub fn derived_from_edge(memory_node_id: &str, episode_node_id: &str) -> GraphEdge {
    GraphEdge::new(memory_node_id, episode_node_id, RelationType::DerivedFrom, 1.0)
}

/// A `contradicts` edge recorded alongside a `Contradiction` row (§4.5
/// "Contradiction check").
pub fn contradicts_edge(belief_node_id: &str, contradicted_by_node_id: &str) -> GraphEdge {
    GraphEdge::new(belief_node_id, contradicted_by_node_id, RelationType::Contradicts, 1.0)
}

/// A `supersedes` edge recorded when a newer memory replaces an older one
/// (§4.5 consolidation, schema/procedure versioning).
pub fn supersedes_edge(new_node_id: &str, old_node_id: &str) -> GraphEdge {
    GraphEdge::new(new_node_id, old_node_id, RelationType::Supersedes, 1.0)
}

/// A symmetric `thematic` edge between two memories that share topics or
/// run above the similarity floor without meeting entity/causal criteria
/// (§4.5 consolidation step 6 "Associations").
pub fn thematic_edge(memory_a: &str, memory_b: &str, similarity: f64) -> GraphEdge {
    GraphEdge::new(memory_a, memory_b, RelationType::Thematic, similarity)
}
