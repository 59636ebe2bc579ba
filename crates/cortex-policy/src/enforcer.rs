//! §4.7 Policy enforcer (C11).

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{Memory, MemoryType, MemoryTypePolicy, Provenance};
use cortex_core::traits::{AgentStore, LanguageReasoner, MemoryStore};

/// Counts from one enforcement pass, folded into the §4.5 consolidation
/// result record.
#[derive(Debug, Clone, Default)]
pub struct EnforcementResult {
    pub expired_deleted: u64,
    pub retention_deleted: u64,
    pub overflow_summarized: u64,
    pub overflow_deleted: u64,
}

impl EnforcementResult {
    pub fn total_deleted(&self) -> u64 {
        self.expired_deleted + self.retention_deleted + self.overflow_deleted
    }
}

pub struct PolicyEnforcer {
    memories: Arc<dyn MemoryStore>,
    agents: Arc<dyn AgentStore>,
    reasoner: Arc<dyn LanguageReasoner>,
    default_policies: Vec<MemoryTypePolicy>,
    eviction_batch_size: usize,
}

impl PolicyEnforcer {
    pub fn new(
        memories: Arc<dyn MemoryStore>,
        agents: Arc<dyn AgentStore>,
        reasoner: Arc<dyn LanguageReasoner>,
        default_policies: Vec<MemoryTypePolicy>,
        eviction_batch_size: usize,
    ) -> Self {
        Self { memories, agents, reasoner, default_policies, eviction_batch_size }
    }

    /// §4.7: run every per-type rule for one agent's memories.
    pub async fn enforce(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<EnforcementResult> {
        let agent = self.agents.get(tenant_id, agent_id).await?;
        let policies: &[MemoryTypePolicy] =
            if agent.policies.is_empty() { &self.default_policies } else { &agent.policies };

        let mut result = EnforcementResult::default();
        let now = Utc::now();

        let all = self.memories.list(tenant_id, agent_id).await?;
        for memory in &all {
            if let Some(expires_at) = memory.expires_at {
                if expires_at <= now {
                    self.memories.delete(tenant_id, agent_id, memory.id).await?;
                    result.expired_deleted += 1;
                }
            }
        }

        for policy in policies {
            self.enforce_type(tenant_id, agent_id, policy, now, &mut result).await?;
        }

        Ok(result)
    }

    async fn enforce_type(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        policy: &MemoryTypePolicy,
        now: chrono::DateTime<Utc>,
        result: &mut EnforcementResult,
    ) -> CortexResult<()> {
        let mut rows = self.memories.list_by_type(tenant_id, agent_id, policy.memory_type).await?;
        rows.retain(|m| m.expires_at.map(|e| e > now).unwrap_or(true));

        if let Some(retention_days) = policy.retention_days {
            let cutoff = now - chrono::Duration::days(retention_days as i64);
            let mut kept = Vec::with_capacity(rows.len());
            for memory in rows {
                if memory.created_at < cutoff {
                    self.memories.delete(tenant_id, agent_id, memory.id).await?;
                    result.retention_deleted += 1;
                } else {
                    kept.push(memory);
                }
            }
            rows = kept;
        }

        let Some(max_memories) = policy.max_memories else {
            return Ok(());
        };
        if (rows.len() as u64) <= max_memories {
            return Ok(());
        }
        let overflow = (rows.len() as u64 - max_memories) as usize;

        // Lowest `confidence * priority_weight` first, oldest first on tie.
        rows.sort_by(|a, b| {
            let key_a = a.confidence * policy.priority_weight;
            let key_b = b.confidence * policy.priority_weight;
            key_a
                .partial_cmp(&key_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        let to_evict: Vec<Memory> = rows.into_iter().take(overflow).collect();

        for batch in to_evict.chunks(self.eviction_batch_size) {
            if policy.auto_summarize {
                self.summarize_and_replace(tenant_id, agent_id, policy.memory_type, batch).await?;
                result.overflow_summarized += batch.len() as u64;
            } else {
                for memory in batch {
                    self.memories.delete(tenant_id, agent_id, memory.id).await?;
                }
                result.overflow_deleted += batch.len() as u64;
            }
        }

        Ok(())
    }

    async fn summarize_and_replace(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_type: MemoryType,
        batch: &[Memory],
    ) -> CortexResult<()> {
        let contents: Vec<String> = batch.iter().map(|m| m.content.clone()).collect();
        let summary = match self.reasoner.summarize(&contents).await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "summarize-on-evict failed; deleting batch without replacement");
                for memory in batch {
                    self.memories.delete(tenant_id, agent_id, memory.id).await?;
                }
                return Ok(());
            }
        };

        let mut confidences: Vec<f64> = batch.iter().map(|m| m.confidence).collect();
        confidences.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = median_of(&confidences);

        let mut replacement =
            Memory::new(tenant_id, agent_id, memory_type, summary, Provenance::Derived, median, batch
                .first()
                .map(|m| m.decay_rate)
                .unwrap_or(0.02));
        replacement.metadata.insert(
            "summarized_from".to_string(),
            serde_json::json!(batch.iter().map(|m| m.id.to_string()).collect::<Vec<_>>()),
        );
        self.memories.upsert(replacement).await?;

        for memory in batch {
            self.memories.delete(tenant_id, agent_id, memory.id).await?;
        }
        info!(count = batch.len(), "summarized and replaced overflow batch");
        Ok(())
    }
}

fn median_of(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::median_of;
    use super::*;
    use cortex_core::models::Agent;
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    #[test]
    fn median_of_odd_length() {
        assert_eq!(median_of(&[0.2, 0.5, 0.9]), 0.5);
    }

    #[test]
    fn median_of_even_length() {
        assert_eq!(median_of(&[0.2, 0.4, 0.6, 0.8]), 0.5);
    }

    #[tokio::test]
    async fn overflow_without_auto_summarize_deletes_lowest_scored() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent = Agent::new(tenant_id, "ext-1", "agent one");
        let agent_id = agent.id;
        store.create(agent).await.unwrap();

        for i in 0..5 {
            let memory = Memory::new(
                tenant_id,
                agent_id,
                MemoryType::Fact,
                format!("fact {i}"),
                Provenance::User,
                0.1 * (i as f64 + 1.0),
                0.02,
            );
            store.upsert(memory).await.unwrap();
        }

        let mut policy = MemoryTypePolicy::new(MemoryType::Fact);
        policy.max_memories = Some(2);
        let reasoner: Arc<dyn LanguageReasoner> = Arc::new(MockLanguageReasoner);
        let enforcer = PolicyEnforcer::new(store.clone(), store.clone(), reasoner, vec![policy], 100);

        let result = enforcer.enforce(tenant_id, agent_id).await.unwrap();
        assert_eq!(result.overflow_deleted, 3);
        let remaining = store.list(tenant_id, agent_id).await.unwrap();
        assert_eq!(remaining.len(), 2);
    }
}
