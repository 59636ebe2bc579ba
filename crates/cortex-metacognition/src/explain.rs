//! Confidence explanation — walks the mutation log for a memory and
//! renders why its confidence sits where it does (`reflect|confidence`
//! route surface).

use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{MutationLogEntry, Tier};
use cortex_core::traits::{MemoryStore, MutationLogStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationSummary {
    pub mutation_type: String,
    pub source_type: String,
    pub delta: f64,
    pub reason: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&MutationLogEntry> for MutationSummary {
    fn from(entry: &MutationLogEntry) -> Self {
        Self {
            mutation_type: format!("{:?}", entry.mutation_type),
            source_type: format!("{:?}", entry.source_type),
            delta: entry.new_confidence - entry.old_confidence,
            reason: entry.reason.clone(),
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceExplanation {
    pub memory_id: MemoryId,
    pub current_confidence: f64,
    pub tier: String,
    pub reinforcement_count: u64,
    pub history: Vec<MutationSummary>,
}

/// Fetches the memory plus its full mutation history and renders a
/// human-readable trail of how `confidence` arrived where it is. History
/// is returned oldest-first so the narrative reads chronologically.
pub async fn explain_confidence(
    memories: &Arc<dyn MemoryStore>,
    mutation_log: &Arc<dyn MutationLogStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
    memory_id: MemoryId,
) -> CortexResult<ConfidenceExplanation> {
    let memory = memories.get(tenant_id, agent_id, memory_id).await?;
    let mut history = mutation_log.list_for_memory(memory_id).await?;
    history.sort_by_key(|e| e.created_at);

    let tier = match memory.tier() {
        Tier::Hot => "hot",
        Tier::Warm => "warm",
        Tier::Cold => "cold",
        Tier::Archive => "archive",
    };

    Ok(ConfidenceExplanation {
        memory_id,
        current_confidence: memory.confidence,
        tier: tier.to_string(),
        reinforcement_count: memory.reinforcement_count,
        history: history.iter().map(MutationSummary::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{Memory, MemoryType, MutationSourceType, MutationType, Provenance};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn explanation_includes_history_in_chronological_order() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "fact", Provenance::User, 0.6, 0.02);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        let earlier = MutationLogEntry::new(id, MutationType::Reinforce, MutationSourceType::Explicit, None, 0.5, 0.6, 0, 1, "earlier");
        let later = MutationLogEntry::new(id, MutationType::Reinforce, MutationSourceType::Explicit, None, 0.6, 0.7, 1, 2, "later");
        let mutation_log: Arc<dyn MutationLogStore> = store.clone();
        mutation_log.append(earlier).await.unwrap();
        mutation_log.append(later).await.unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let explanation = explain_confidence(&memories, &mutation_log, tenant_id, agent_id, id).await.unwrap();

        assert_eq!(explanation.history.len(), 2);
        assert_eq!(explanation.history[0].reason, "earlier");
        assert_eq!(explanation.history[1].reason, "later");
    }
}
