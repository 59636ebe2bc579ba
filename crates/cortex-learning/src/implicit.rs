//! §4.9 "Implicit feedback" — the reasoner inspects a conversation turn
//! against the memories that were recalled into it and infers feedback
//! signals, which are applied exactly like explicit ones but tagged
//! `MutationSourceType::Implicit`. Invalid memory ids or ids that don't
//! belong to this agent are silently dropped.

use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{FeedbackSignal, Memory, MutationSourceType};
use cortex_core::traits::{FeedbackStore, LanguageReasoner, MemoryStore};
use tracing::warn;

pub async fn detect_and_apply_implicit(
    memories: &Arc<dyn MemoryStore>,
    feedback: &Arc<dyn FeedbackStore>,
    confidence: &ConfidenceEngine,
    reasoner: &Arc<dyn LanguageReasoner>,
    tenant_id: TenantId,
    agent_id: AgentId,
    conversation: &str,
    recalled: &[(MemoryId, String)],
) -> CortexResult<Vec<Memory>> {
    let recalled_pairs: Vec<(String, String)> = recalled
        .iter()
        .map(|(id, content)| (id.to_string(), content.clone()))
        .collect();

    let items = reasoner.detect_implicit_feedback(conversation, &recalled_pairs).await?;

    let mut applied = Vec::with_capacity(items.len());
    for item in items {
        let memory_id = match MemoryId::parse(&item.memory_id) {
            Ok(id) => id,
            Err(_) => {
                warn!(memory_id = %item.memory_id, "implicit feedback referenced an unparseable memory id, dropping");
                continue;
            }
        };

        if memories.get(tenant_id, agent_id, memory_id).await.is_err() {
            warn!(memory_id = %item.memory_id, "implicit feedback referenced an unknown memory, dropping");
            continue;
        }

        let mut signal = FeedbackSignal::new(memory_id, agent_id, item.signal_type);
        signal.context = Some(item.evidence.clone());
        feedback.append(signal).await?;

        let effect = cortex_core::constants::feedback_effect(item.signal_type);
        let updated = confidence
            .apply_feedback_effect(
                tenant_id,
                agent_id,
                memory_id,
                effect,
                MutationSourceType::Implicit,
                Some(format!("implicit: {} (confidence {:.2})", item.evidence, item.confidence)),
            )
            .await?;
        applied.push(updated);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{Agent, MemoryType, Provenance};
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn valid_implicit_feedback_is_applied() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent = store.create(Agent::new(tenant_id, "ext-1", "test agent")).await.unwrap();
        let agent_id = agent.id;

        let memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "the sky is blue", Provenance::User, 0.5, 0.02);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let feedback: Arc<dyn FeedbackStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());
        let reasoner: Arc<dyn LanguageReasoner> = Arc::new(MockLanguageReasoner::default());

        let recalled = vec![(id, "the sky is blue".to_string())];
        let applied = detect_and_apply_implicit(
            &memories,
            &feedback,
            &confidence,
            &reasoner,
            tenant_id,
            agent_id,
            "thanks, exactly — the sky is blue, that's helpful",
            &recalled,
        )
        .await
        .unwrap();

        assert_eq!(applied.len(), 1);
        assert!(applied[0].confidence >= 0.5);
    }

    #[tokio::test]
    async fn unknown_memory_id_is_silently_dropped() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let feedback: Arc<dyn FeedbackStore> = store.clone();
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());
        let reasoner: Arc<dyn LanguageReasoner> = Arc::new(MockLanguageReasoner::default());

        let bogus_id = MemoryId::new();
        let recalled = vec![(bogus_id, "some useful content".to_string())];
        let applied = detect_and_apply_implicit(
            &memories,
            &feedback,
            &confidence,
            &reasoner,
            tenant_id,
            agent_id,
            "thanks, exactly — that useful content helped",
            &recalled,
        )
        .await
        .unwrap();

        assert!(applied.is_empty());
    }
}
