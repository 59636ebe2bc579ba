//! §4.2 "Edge decay" and "Pruning rules", run as part of the §4.8 decay
//! pass.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::traits::GraphStore;
use cortex_graph::edge_ops::{decay_strength, excess_indices_by_strength, should_prune};

#[derive(Debug, Clone, Default)]
pub struct EdgeDecayOutcome {
    pub decayed: u64,
    pub pruned: u64,
}

#[allow(clippy::too_many_arguments)]
pub async fn decay_and_prune_edges(
    graph: &Arc<dyn GraphStore>,
    lambda_per_hour: f64,
    strength_floor: f64,
    stale_days: i64,
    min_traversal_count: u64,
    max_per_source: usize,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<EdgeDecayOutcome> {
    let mut outcome = EdgeDecayOutcome::default();
    let now = Utc::now();
    let all = graph.all_edges(tenant_id, agent_id).await?;

    let mut survivors = Vec::with_capacity(all.len());
    for mut edge in all {
        let reference = edge.last_traversed_at.unwrap_or(edge.created_at);
        let elapsed_hours = (now - reference).num_seconds() as f64 / 3_600.0;
        edge.strength = decay_strength(edge.strength, elapsed_hours, lambda_per_hour);
        outcome.decayed += 1;

        if should_prune(&edge, now, strength_floor, stale_days, min_traversal_count) {
            graph
                .delete_edge(&edge.source_id, &edge.target_id, edge.relation_type)
                .await?;
            outcome.pruned += 1;
        } else {
            graph.upsert_edge(edge.clone()).await?;
            survivors.push(edge);
        }
    }

    // Per-source cap: keep only the top `max_per_source` by strength.
    let mut by_source: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, edge) in survivors.iter().enumerate() {
        by_source.entry(edge.source_id.clone()).or_default().push(i);
    }
    for indices in by_source.values() {
        let strengths: Vec<f64> = indices.iter().map(|&i| survivors[i].strength).collect();
        for excess in excess_indices_by_strength(&strengths, max_per_source) {
            let edge = &survivors[indices[excess]];
            graph
                .delete_edge(&edge.source_id, &edge.target_id, edge.relation_type)
                .await?;
            outcome.pruned += 1;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cortex_core::models::{GraphEdge, RelationType};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn stale_untraversed_edge_is_pruned() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut edge = GraphEdge::new("a", "b", RelationType::Causal, 0.5);
        edge.created_at = Utc::now() - Duration::days(120);
        store.upsert_edge(edge).await.unwrap();

        let graph: Arc<dyn GraphStore> = Arc::new(store);
        let outcome = decay_and_prune_edges(&graph, 0.001, 0.05, 90, 3, 50, tenant_id, agent_id)
            .await
            .unwrap();

        assert_eq!(outcome.pruned, 1);
        assert!(graph.get_edge("a", "b", RelationType::Causal).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fresh_edge_survives_and_decays() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        store.upsert_edge(GraphEdge::new("a", "b", RelationType::Causal, 0.9)).await.unwrap();

        let graph: Arc<dyn GraphStore> = Arc::new(store);
        let outcome = decay_and_prune_edges(&graph, 0.01, 0.05, 90, 3, 50, tenant_id, agent_id)
            .await
            .unwrap();

        assert_eq!(outcome.decayed, 1);
        assert_eq!(outcome.pruned, 0);
        assert!(graph.get_edge("a", "b", RelationType::Causal).await.unwrap().is_some());
    }
}
