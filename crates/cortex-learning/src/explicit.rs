//! §4.9 "Explicit feedback" — maps directly through the §4.1/§4.5 feedback
//! effect table.

use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{FeedbackSignal, FeedbackSignalType, Memory, MutationSourceType};
use cortex_core::traits::{FeedbackStore, MemoryStore};

pub async fn record_explicit(
    memories: &Arc<dyn MemoryStore>,
    feedback: &Arc<dyn FeedbackStore>,
    confidence: &ConfidenceEngine,
    tenant_id: TenantId,
    agent_id: AgentId,
    memory_id: MemoryId,
    signal_type: FeedbackSignalType,
    context: Option<String>,
) -> CortexResult<Memory> {
    // Ownership check — surfaces `MemoryNotFound`/`NotFound` before touching
    // the feedback log if the id doesn't belong to this agent.
    memories.get(tenant_id, agent_id, memory_id).await?;

    let mut signal = FeedbackSignal::new(memory_id, agent_id, signal_type);
    signal.context = context.clone();
    feedback.append(signal).await?;

    let effect = cortex_core::constants::feedback_effect(signal_type);
    confidence
        .apply_feedback_effect(tenant_id, agent_id, memory_id, effect, MutationSourceType::Explicit, context)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn helpful_signal_reinforces_the_memory() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "fact", Provenance::User, 0.5, 0.02);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let feedback: Arc<dyn FeedbackStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());

        let updated = record_explicit(
            &memories,
            &feedback,
            &confidence,
            tenant_id,
            agent_id,
            id,
            FeedbackSignalType::Helpful,
            None,
        )
        .await
        .unwrap();

        assert!(updated.confidence > 0.5);
        assert_eq!(feedback.list_for_memory(id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn contradicted_signal_penalizes_the_memory() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "fact", Provenance::User, 0.5, 0.02);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let feedback: Arc<dyn FeedbackStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());

        let updated = record_explicit(
            &memories,
            &feedback,
            &confidence,
            tenant_id,
            agent_id,
            id,
            FeedbackSignalType::Contradicted,
            Some("user said this was wrong".to_string()),
        )
        .await
        .unwrap();

        assert!(updated.confidence < 0.5);
    }
}
