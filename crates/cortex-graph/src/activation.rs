use std::collections::{HashMap, HashSet, VecDeque};

use cortex_core::constants::relation_decay_multiplier;
use cortex_core::errors::CortexResult;
use cortex_core::models::RelationType;
use cortex_core::traits::GraphStore;

/// Minimum activation below which a node is not expanded further (§4.3
/// step 2 "Graph expansion").
pub const ACTIVATION_FLOOR: f64 = 0.05;

/// Default neighbor fanout cap per node (§4.3 complexity budget).
pub const DEFAULT_FANOUT_LIMIT: usize = 20;

/// Result of BFS spreading activation from a set of seed nodes.
#[derive(Debug, Clone, Default)]
pub struct ActivationResult {
    /// Best activation reached for each node id, seeds included at 1.0.
    pub activation: HashMap<String, f64>,
    /// The hop distance at which each node's best activation was recorded.
    pub depth: HashMap<String, u32>,
}

/// §4.3 step 2: seed a BFS from each candidate's memory id. At hop `d`
/// (starting at 1), for each edge `(u -> v, type)` matching
/// `relation_filter` (if any), propagate
/// `act(v) = max(act(v), act(u) * strength * decay_multiplier(type))`.
/// Stop expanding past `max_hops` or once activation falls below
/// [`ACTIVATION_FLOOR`].
pub async fn spreading_activation(
    store: &dyn GraphStore,
    seeds: &[(String, f64)],
    max_hops: u32,
    fanout_limit: usize,
    relation_filter: Option<&[RelationType]>,
) -> CortexResult<ActivationResult> {
    let mut result = ActivationResult::default();
    let mut frontier: VecDeque<(String, u32)> = VecDeque::new();

    for (id, seed_activation) in seeds {
        result.activation.insert(id.clone(), seed_activation.max(
            result.activation.get(id).copied().unwrap_or(0.0),
        ));
        result.depth.entry(id.clone()).or_insert(0);
        frontier.push_back((id.clone(), 0));
    }

    let mut visited_at_hop: HashSet<(String, u32)> = HashSet::new();

    while let Some((node_id, hop)) = frontier.pop_front() {
        if hop >= max_hops {
            continue;
        }
        let current_activation = *result.activation.get(&node_id).unwrap_or(&0.0);
        if current_activation < ACTIVATION_FLOOR {
            continue;
        }
        if !visited_at_hop.insert((node_id.clone(), hop)) {
            continue;
        }

        let mut edges = store.edges_from(&node_id).await?;
        if let Some(filter) = relation_filter {
            edges.retain(|e| filter.contains(&e.relation_type));
        }
        edges.sort_by(|a, b| b.strength.partial_cmp(&a.strength).unwrap_or(std::cmp::Ordering::Equal));
        edges.truncate(fanout_limit);

        for edge in edges {
            let propagated =
                current_activation * edge.strength * relation_decay_multiplier(edge.relation_type);
            if propagated < ACTIVATION_FLOOR {
                continue;
            }
            let slot = result.activation.entry(edge.target_id.clone()).or_insert(0.0);
            if propagated > *slot {
                *slot = propagated;
                result.depth.insert(edge.target_id.clone(), hop + 1);
            }
            frontier.push_back((edge.target_id, hop + 1));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::GraphEdge;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeGraphStore {
        edges: dashmap_stub::EdgeMap,
    }

    mod dashmap_stub {
        use super::GraphEdge;
        use std::collections::HashMap;
        use std::sync::Mutex;

        #[derive(Default)]
        pub struct EdgeMap(pub Mutex<HashMap<String, Vec<GraphEdge>>>);
    }

    #[async_trait::async_trait]
    impl GraphStore for FakeGraphStore {
        async fn upsert_edge(&self, edge: GraphEdge) -> CortexResult<GraphEdge> {
            self.edges.0.lock().unwrap().entry(edge.source_id.clone()).or_default().push(edge.clone());
            Ok(edge)
        }
        async fn get_edge(
            &self,
            _source_id: &str,
            _target_id: &str,
            _relation_type: RelationType,
        ) -> CortexResult<Option<GraphEdge>> {
            Ok(None)
        }
        async fn edges_from(&self, node_id: &str) -> CortexResult<Vec<GraphEdge>> {
            Ok(self.edges.0.lock().unwrap().get(node_id).cloned().unwrap_or_default())
        }
        async fn record_traversal(
            &self,
            _source_id: &str,
            _target_id: &str,
            _relation_type: RelationType,
        ) -> CortexResult<()> {
            Ok(())
        }
        async fn all_edges(
            &self,
            _tenant_id: cortex_core::ids::TenantId,
            _agent_id: cortex_core::ids::AgentId,
        ) -> CortexResult<Vec<GraphEdge>> {
            Ok(self.edges.0.lock().unwrap().values().flatten().cloned().collect())
        }
        async fn delete_edge(
            &self,
            source_id: &str,
            _target_id: &str,
            _relation_type: RelationType,
        ) -> CortexResult<()> {
            self.edges.0.lock().unwrap().remove(source_id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn activation_decays_across_hops() {
        let store = FakeGraphStore::default();
        store
            .upsert_edge(GraphEdge::new("a", "b", RelationType::Causal, 0.9))
            .await
            .unwrap();
        store
            .upsert_edge(GraphEdge::new("b", "c", RelationType::Causal, 0.9))
            .await
            .unwrap();

        let result = spreading_activation(
            &store,
            &[("a".to_string(), 1.0)],
            2,
            DEFAULT_FANOUT_LIMIT,
            None,
        )
        .await
        .unwrap();

        assert!(result.activation["b"] > result.activation["c"]);
        assert_eq!(result.depth["c"], 2);
    }

    #[allow(dead_code)]
    fn _type_check(store: Arc<dyn GraphStore>) {
        let _ = store;
    }
}
