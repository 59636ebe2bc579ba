use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use cortex_core::errors::{CortexResult, StorageError};
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{Memory, MutationLogEntry, MutationSourceType, MutationType};
use cortex_core::traits::{MemoryStore, MutationLogStore};

use crate::arithmetic;

/// Applies confidence mutations to a single memory through the store
/// traits (§4.1). Every mutation is a single store update followed by a
/// best-effort log write — a log failure never rolls back the
/// already-committed confidence change.
pub struct ConfidenceEngine {
    memories: Arc<dyn MemoryStore>,
    mutation_log: Arc<dyn MutationLogStore>,
}

impl ConfidenceEngine {
    pub fn new(memories: Arc<dyn MemoryStore>, mutation_log: Arc<dyn MutationLogStore>) -> Self {
        Self { memories, mutation_log }
    }

    async fn mutate(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
        mutation_type: MutationType,
        source_type: MutationSourceType,
        source_id: Option<String>,
        reason: &str,
        apply: impl FnOnce(&mut Memory),
    ) -> CortexResult<Memory> {
        let mut memory = self
            .memories
            .get(tenant_id, agent_id, id)
            .await
            .map_err(|e| match e {
                cortex_core::CortexError::StorageError(StorageError::NotFound { .. }) => {
                    cortex_core::CortexError::MemoryNotFound { id: id.to_string() }
                }
                other => other,
            })?;

        let old_confidence = memory.confidence;
        let old_reinforcement_count = memory.reinforcement_count;
        apply(&mut memory);
        let updated = self.memories.upsert(memory).await?;

        let entry = MutationLogEntry::new(
            id,
            mutation_type,
            source_type,
            source_id,
            old_confidence,
            updated.confidence,
            old_reinforcement_count,
            updated.reinforcement_count,
            reason,
        );
        if let Err(e) = self.mutation_log.append(entry).await {
            warn!(memory_id = %id, error = %e, "mutation log write failed; confidence mutation already committed");
        }

        Ok(updated)
    }

    /// §4.1 Reinforce.
    pub async fn reinforce(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
        source_type: MutationSourceType,
        source_id: Option<String>,
    ) -> CortexResult<Memory> {
        self.mutate(
            tenant_id,
            agent_id,
            id,
            MutationType::Reinforce,
            source_type,
            source_id,
            "reinforce",
            |memory| {
                memory.confidence = arithmetic::reinforce(memory.confidence);
                memory.reinforcement_count = arithmetic::reinforce_count(memory.reinforcement_count);
                memory.last_verified_at = Utc::now();
            },
        )
        .await
    }

    /// §4.1 Penalize.
    pub async fn penalize(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
        source_type: MutationSourceType,
        source_id: Option<String>,
    ) -> CortexResult<Memory> {
        self.mutate(
            tenant_id,
            agent_id,
            id,
            MutationType::Penalize,
            source_type,
            source_id,
            "penalize",
            |memory| {
                memory.confidence = arithmetic::penalize(memory.confidence);
                memory.reinforcement_count = arithmetic::penalize_count(memory.reinforcement_count);
            },
        )
        .await
    }

    /// §4.1 "Feedback effects" — applies a fixed `(confidence_delta,
    /// reinforcement_delta)` pair from the feedback table.
    pub async fn apply_feedback_effect(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
        effect: cortex_core::constants::FeedbackEffect,
        source_type: MutationSourceType,
        source_id: Option<String>,
    ) -> CortexResult<Memory> {
        self.mutate(
            tenant_id,
            agent_id,
            id,
            MutationType::Reinforce,
            source_type,
            source_id,
            "feedback",
            |memory| {
                memory.confidence = arithmetic::apply_delta(memory.confidence, effect.confidence_delta);
                memory.reinforcement_count =
                    arithmetic::apply_count_delta(memory.reinforcement_count, effect.reinforcement_delta);
            },
        )
        .await
    }

    /// §4.1 "Access boost" — applied on successful retrieval.
    pub async fn access_boost(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
        boost: f64,
    ) -> CortexResult<Memory> {
        self.mutate(
            tenant_id,
            agent_id,
            id,
            MutationType::Reinforce,
            MutationSourceType::System,
            None,
            "access_boost",
            |memory| {
                memory.confidence = arithmetic::access_boost(memory.confidence, boost);
                memory.access_count += 1;
                memory.last_accessed_at = Utc::now();
            },
        )
        .await
    }

    /// §4.1 Decay — applied by the background decay worker, not user-facing.
    pub async fn decay(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        id: MemoryId,
    ) -> CortexResult<Memory> {
        self.mutate(
            tenant_id,
            agent_id,
            id,
            MutationType::Decay,
            MutationSourceType::System,
            None,
            "decay",
            |memory| {
                let elapsed_days =
                    (Utc::now() - memory.last_accessed_at).num_seconds() as f64 / 86_400.0;
                let tier = memory.tier();
                memory.confidence = arithmetic::decay(memory.confidence, memory.decay_rate, tier, elapsed_days);
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    fn engine() -> (ConfidenceEngine, Arc<dyn MemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let memories: Arc<dyn MemoryStore> = store.clone();
        let mutation_log: Arc<dyn MutationLogStore> = store;
        (ConfidenceEngine::new(memories.clone(), mutation_log), memories)
    }

    #[tokio::test]
    async fn reinforce_raises_confidence_and_logs_the_mutation() {
        let (engine, memories) = engine();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "x", Provenance::User, 0.5, 0.01);
        let id = memory.id;
        memories.upsert(memory).await.unwrap();

        let updated = engine.reinforce(tenant_id, agent_id, id, MutationSourceType::Explicit, None).await.unwrap();
        assert!(updated.confidence > 0.5);
        assert_eq!(updated.reinforcement_count, 1);

        let log = engine.mutation_log.list_for_memory(id).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].mutation_type, MutationType::Reinforce);
    }

    #[tokio::test]
    async fn penalize_lowers_confidence_and_decrements_count() {
        let (engine, memories) = engine();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let mut memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "x", Provenance::User, 0.5, 0.01);
        memory.reinforcement_count = 3;
        let id = memory.id;
        memories.upsert(memory).await.unwrap();

        let updated = engine.penalize(tenant_id, agent_id, id, MutationSourceType::Explicit, None).await.unwrap();
        assert!(updated.confidence < 0.5);
        assert_eq!(updated.reinforcement_count, 2);
    }

    #[tokio::test]
    async fn reinforce_unknown_memory_maps_to_memory_not_found() {
        let (engine, _memories) = engine();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let err = engine
            .reinforce(tenant_id, agent_id, MemoryId::new(), MutationSourceType::Explicit, None)
            .await
            .unwrap_err();
        assert!(matches!(err, cortex_core::CortexError::MemoryNotFound { .. }));
    }
}
