//! Uncertainty report — a per-agent snapshot of where confidence is thin:
//! tier distribution, the lowest-confidence memories, open contradictions,
//! and schemas that haven't earned enough evidence yet.

use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, SchemaId, TenantId};
use cortex_core::models::Tier;
use cortex_core::traits::{ContradictionStore, MemoryStore, SchemaStore};
use serde::{Deserialize, Serialize};

const LOWEST_CONFIDENCE_SAMPLE_SIZE: usize = 10;
const LOW_EVIDENCE_SCHEMA_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierCounts {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub archive: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncertaintyReport {
    pub total_memories: usize,
    pub tier_counts: TierCounts,
    pub lowest_confidence: Vec<(MemoryId, f64)>,
    pub open_contradictions: usize,
    pub low_evidence_schemas: Vec<SchemaId>,
}

pub async fn uncertainty_report(
    memories: &Arc<dyn MemoryStore>,
    contradictions: &Arc<dyn ContradictionStore>,
    schemas: &Arc<dyn SchemaStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<UncertaintyReport> {
    let all_memories = memories.list(tenant_id, agent_id).await?;

    let mut tier_counts = TierCounts::default();
    let mut open_contradictions = 0usize;
    let mut by_confidence: Vec<(MemoryId, f64)> = Vec::with_capacity(all_memories.len());

    for memory in &all_memories {
        match memory.tier() {
            Tier::Hot => tier_counts.hot += 1,
            Tier::Warm => tier_counts.warm += 1,
            Tier::Cold => tier_counts.cold += 1,
            Tier::Archive => tier_counts.archive += 1,
        }
        by_confidence.push((memory.id, memory.confidence));
        open_contradictions += contradictions.list_for_memory(memory.id).await?.len();
    }

    by_confidence.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    by_confidence.truncate(LOWEST_CONFIDENCE_SAMPLE_SIZE);

    let low_evidence_schemas = schemas
        .list(tenant_id, agent_id)
        .await?
        .into_iter()
        .filter(|s| s.confidence < LOW_EVIDENCE_SCHEMA_CONFIDENCE)
        .map(|s| s.id)
        .collect();

    Ok(UncertaintyReport {
        total_memories: all_memories.len(),
        tier_counts,
        lowest_confidence: by_confidence,
        open_contradictions,
        low_evidence_schemas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{Contradiction, Memory, MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn report_buckets_by_tier_and_surfaces_contradictions() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let hot = Memory::new(tenant_id, agent_id, MemoryType::Fact, "hot fact", Provenance::User, 0.95, 0.02);
        let cold = Memory::new(tenant_id, agent_id, MemoryType::Fact, "cold fact", Provenance::User, 0.45, 0.02);
        let cold_id = cold.id;
        store.upsert(hot).await.unwrap();
        store.upsert(cold).await.unwrap();

        let contradictions: Arc<dyn ContradictionStore> = store.clone();
        contradictions
            .append(Contradiction::new(cold_id, MemoryId::new()))
            .await
            .unwrap();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let schemas: Arc<dyn SchemaStore> = store.clone();
        let report = uncertainty_report(&memories, &contradictions, &schemas, tenant_id, agent_id).await.unwrap();

        assert_eq!(report.total_memories, 2);
        assert_eq!(report.tier_counts.hot, 1);
        assert_eq!(report.tier_counts.cold, 1);
        assert_eq!(report.open_contradictions, 1);
        assert_eq!(report.lowest_confidence[0].0, cold_id);
    }
}
