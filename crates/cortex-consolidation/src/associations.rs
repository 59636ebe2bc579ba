//! §4.5 step 6 "Associations" — thematic edges between a freshly written
//! memory and whatever else in the agent's store resembles it. `derived_from`
//! edges are created inline at insertion time (see `belief.rs`); this step
//! only adds the thematic layer on top.

use std::sync::Arc;

use cortex_core::config::ConsolidationConfig;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::traits::{GraphStore, MemoryStore};
use cortex_graph::builder::thematic_edge;

use crate::util::cosine;

pub async fn build_thematic_associations(
    memories: &Arc<dyn MemoryStore>,
    graph: &Arc<dyn GraphStore>,
    config: &ConsolidationConfig,
    tenant_id: TenantId,
    agent_id: AgentId,
    new_memory_ids: &[MemoryId],
) -> CortexResult<u64> {
    if new_memory_ids.is_empty() {
        return Ok(0);
    }

    let all = memories.list(tenant_id, agent_id).await?;
    let mut created = 0u64;

    for &new_id in new_memory_ids {
        let Some(new_memory) = all.iter().find(|m| m.id == new_id) else { continue };
        let Some(new_embedding) = new_memory.embedding.as_ref() else { continue };

        for other in &all {
            if other.id == new_id {
                continue;
            }
            let Some(other_embedding) = other.embedding.as_ref() else { continue };
            let sim = cosine(new_embedding, other_embedding);
            if sim >= config.cluster_threshold {
                graph
                    .upsert_edge(thematic_edge(&new_id.to_string(), &other.id.to_string(), sim))
                    .await?;
                created += 1;
            }
        }
    }

    Ok(created)
}
