//! §6 `/v1/agents/{id}/mind` — a read-only snapshot of an agent's current
//! cognitive state, for observability/debugging rather than any operation
//! the kernel itself performs.

use serde::{Deserialize, Serialize};

use cortex_core::constants::tier;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::WorkingMemorySession;

use crate::kernel::CortexKernel;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierDistribution {
    pub hot: u64,
    pub warm: u64,
    pub cold: u64,
    pub archive: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindSnapshot {
    pub session: WorkingMemorySession,
    pub memory_count: u64,
    pub episode_count: u64,
    pub procedure_count: u64,
    pub schema_count: u64,
    pub memory_tiers: TierDistribution,
}

impl CortexKernel {
    pub async fn mind(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<MindSnapshot> {
        let session = self
            .sessions
            .get_or_create(tenant_id, agent_id, self.config.session.max_slots)
            .await?;

        let memories = self.memories.list(tenant_id, agent_id).await?;
        let episodes = self.episodes.list(tenant_id, agent_id).await?;
        let procedures = self.procedures.list(tenant_id, agent_id).await?;
        let schemas = self.schemas.list(tenant_id, agent_id).await?;

        let mut tiers = TierDistribution::default();
        for memory in &memories {
            match tier(memory.confidence) {
                cortex_core::models::Tier::Hot => tiers.hot += 1,
                cortex_core::models::Tier::Warm => tiers.warm += 1,
                cortex_core::models::Tier::Cold => tiers.cold += 1,
                cortex_core::models::Tier::Archive => tiers.archive += 1,
            }
        }

        Ok(MindSnapshot {
            session,
            memory_count: memories.len() as u64,
            episode_count: episodes.len() as u64,
            procedure_count: procedures.len() as u64,
            schema_count: schemas.len() as u64,
            memory_tiers: tiers,
        })
    }
}
