//! §4.2 memory creation: dedup-then-reinforce against near-duplicates.

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{Memory, MemoryType, MutationSourceType, Provenance};
use tracing::info;

use crate::kernel::CortexKernel;

pub struct CreateMemoryParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub content: String,
    pub provenance: Provenance,
    pub confidence: f64,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Result of `create_memory`: the persisted memory plus whether it reused
/// an existing one (§4.2 "do not create; instead Reinforce... and return
/// it flagged `reinforced=true`").
pub struct CreateMemoryOutcome {
    pub memory: Memory,
    pub reinforced: bool,
}

impl CortexKernel {
    pub async fn create_memory(&self, params: CreateMemoryParams) -> CortexResult<CreateMemoryOutcome> {
        let scope = cortex_core::ids::AgentScope::new(params.tenant_id, params.agent_id);
        let _guard = self.locks.acquire(scope).await;

        let embedding = self.embeddings.embed(&params.content).await.ok();

        if let Some(ref embedding) = embedding {
            let hits = self
                .memories
                .vector_search(params.tenant_id, params.agent_id, embedding, 5)
                .await?;

            for hit in hits {
                if hit.similarity < self.config.consolidation.dedup_threshold {
                    break;
                }
                let existing = self.memories.get(params.tenant_id, params.agent_id, hit.id).await?;
                if existing.memory_type != params.memory_type {
                    continue;
                }
                let reinforced = self
                    .confidence
                    .reinforce(
                        params.tenant_id,
                        params.agent_id,
                        existing.id,
                        MutationSourceType::Explicit,
                        None,
                    )
                    .await?;
                self.metrics.reinforcements.incr();
                info!(memory_id = %reinforced.id, similarity = hit.similarity, "create_memory deduped into reinforce");
                return Ok(CreateMemoryOutcome { memory: reinforced, reinforced: true });
            }
        }

        let mut memory = Memory::new(
            params.tenant_id,
            params.agent_id,
            params.memory_type,
            params.content,
            params.provenance,
            params.confidence,
            self.config.decay.episode_decay_rate.max(0.01),
        );
        memory.embedding = embedding;
        memory.expires_at = params.expires_at;

        let created = self.memories.upsert(memory).await?;
        self.metrics.memories_created.incr();
        Ok(CreateMemoryOutcome { memory: created, reinforced: false })
    }

    /// §4.3 "Access boost": a successful direct fetch counts as a retrieval.
    pub async fn get_memory(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<Memory> {
        self.confidence
            .access_boost(tenant_id, agent_id, id, cortex_core::constants::ACCESS_BOOST)
            .await
    }

    /// Deletes a memory and any graph edges touching it (§3 "Ownership").
    /// Entity mentions of a deleted memory are left in place — they carry
    /// no back-reference the graph needs to stay consistent, and the store
    /// traits expose no mention-removal operation.
    pub async fn delete_memory(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<()> {
        let scope = cortex_core::ids::AgentScope::new(tenant_id, agent_id);
        let _guard = self.locks.acquire(scope).await;

        let node_id = id.to_string();
        let edges = self.graph.edges_from(&node_id).await?;
        for edge in edges {
            self.graph
                .delete_edge(&edge.source_id, &edge.target_id, edge.relation_type)
                .await?;
        }

        self.memories.delete(tenant_id, agent_id, id).await?;
        self.metrics.memories_deleted.incr();
        Ok(())
    }
}
