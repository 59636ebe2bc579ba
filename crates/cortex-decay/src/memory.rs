//! §4.8 "Memory decay": apply §4.1 time decay to every memory, then track
//! how many consecutive passes a memory has spent at the `Archive` tier —
//! two in a row deletes it outright.

use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::constants::MEMORY_ARCHIVE_TERMINAL_PASSES;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::Tier;
use cortex_core::traits::MemoryStore;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct MemoryDecayOutcome {
    pub decayed: u64,
    pub archived_terminal: u64,
}

pub async fn decay_memories(
    memories: &Arc<dyn MemoryStore>,
    confidence: &ConfidenceEngine,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<MemoryDecayOutcome> {
    let mut outcome = MemoryDecayOutcome::default();
    let all = memories.list(tenant_id, agent_id).await?;

    for memory in all {
        let decayed = confidence.decay(tenant_id, agent_id, memory.id).await?;
        outcome.decayed += 1;

        let mut updated = decayed.clone();
        if decayed.tier() == Tier::Archive {
            updated.consecutive_archive_passes += 1;
        } else {
            updated.consecutive_archive_passes = 0;
        }

        if updated.consecutive_archive_passes >= MEMORY_ARCHIVE_TERMINAL_PASSES {
            memories.delete(tenant_id, agent_id, updated.id).await?;
            outcome.archived_terminal += 1;
            info!(memory_id = %updated.id, "memory archived for two consecutive passes; deleted");
        } else {
            memories.upsert(updated).await?;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cortex_core::models::{Memory, MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn stale_low_confidence_memory_is_deleted_after_two_passes() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut memory = Memory::new(
            tenant_id,
            agent_id,
            MemoryType::Fact,
            "stale fact",
            Provenance::Derived,
            0.2,
            0.5,
        );
        memory.last_accessed_at = chrono::Utc::now() - Duration::days(30);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());

        decay_memories(&memories, &confidence, tenant_id, agent_id).await.unwrap();
        let outcome = decay_memories(&memories, &confidence, tenant_id, agent_id).await.unwrap();

        assert_eq!(outcome.archived_terminal, 1);
        assert!(memories.get(tenant_id, agent_id, id).await.is_err());
    }

    #[tokio::test]
    async fn healthy_memory_survives_a_pass() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let memory = Memory::new(
            tenant_id,
            agent_id,
            MemoryType::Fact,
            "fresh fact",
            Provenance::Derived,
            0.95,
            0.01,
        );
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());

        let outcome = decay_memories(&memories, &confidence, tenant_id, agent_id).await.unwrap();

        assert_eq!(outcome.decayed, 1);
        assert_eq!(outcome.archived_terminal, 0);
        assert!(memories.get(tenant_id, agent_id, id).await.is_ok());
    }
}
