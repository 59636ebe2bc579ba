use cortex_core::constants::EDGE_STRENGTH_FLOOR;
use cortex_core::models::GraphEdge;

/// §4.2 "Edge write contract" — upsert on `(source, target, relation_type)`
/// keeps the maximum strength. Returns the edge to persist (either the
/// incoming one, or `existing` with its strength raised).
pub fn merge_on_upsert(existing: Option<&GraphEdge>, incoming: GraphEdge) -> GraphEdge {
    match existing {
        Some(existing) => {
            let mut merged = existing.clone();
            merged.strength = existing.strength.max(incoming.strength);
            merged
        }
        None => incoming,
    }
}

/// §4.2 "Edge decay": `s' = max(0.05, s * exp(-lambda * h))` once `h >= 1`
/// hour has elapsed since the edge was last traversed (or created, if
/// never traversed). `lambda` is a per-hour decay rate.
pub fn decay_strength(strength: f64, elapsed_hours: f64, lambda: f64) -> f64 {
    if elapsed_hours < 1.0 {
        return strength;
    }
    (strength * (-lambda * elapsed_hours).exp()).max(EDGE_STRENGTH_FLOOR)
}

/// §4.2 "Pruning rules". `stale_days` defaults to 90, `min_traversal_count`
/// to 3, `strength_floor` to 0.05 — the caller supplies the agent's
/// configured values.
pub fn should_prune(
    edge: &GraphEdge,
    now: chrono::DateTime<chrono::Utc>,
    strength_floor: f64,
    stale_days: i64,
    min_traversal_count: u64,
) -> bool {
    if edge.strength < strength_floor {
        return true;
    }
    let reference = edge.last_traversed_at.unwrap_or(edge.created_at);
    let stale = (now - reference).num_days() >= stale_days;
    stale && edge.traversal_count < min_traversal_count
}

/// §4.2 "Pruning rules" — keep only the top `max_per_source` edges by
/// strength for one source node, returning the indices to drop.
pub fn excess_indices_by_strength(strengths: &[f64], max_per_source: usize) -> Vec<usize> {
    if strengths.len() <= max_per_source {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..strengths.len()).collect();
    order.sort_by(|&a, &b| strengths[b].partial_cmp(&strengths[a]).unwrap_or(std::cmp::Ordering::Equal));
    order.into_iter().skip(max_per_source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_floors_at_strength_floor() {
        let decayed = decay_strength(0.1, 10_000.0, 0.1);
        assert_eq!(decayed, EDGE_STRENGTH_FLOOR);
    }

    #[test]
    fn decay_is_noop_under_one_hour() {
        assert_eq!(decay_strength(0.5, 0.5, 0.1), 0.5);
    }

    #[test]
    fn merge_keeps_max_strength() {
        let existing = GraphEdge::new("a", "b", cortex_core::models::RelationType::Causal, 0.6);
        let incoming = GraphEdge::new("a", "b", cortex_core::models::RelationType::Causal, 0.3);
        let merged = merge_on_upsert(Some(&existing), incoming);
        assert_eq!(merged.strength, 0.6);
    }
}
