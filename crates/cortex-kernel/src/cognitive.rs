//! On-demand consolidation/decay triggers (§4.5, §4.8) and the three
//! metacognitive read operations (§4.10, §6 `/v1/cognitive/*`).

use cortex_consolidation::{ConsolidationResult, ConsolidationScope};
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_decay::DecayResult;
use cortex_metacognition::explain::ConfidenceExplanation;
use cortex_metacognition::reflection::StrategyReflection;
use cortex_metacognition::uncertainty::UncertaintyReport;

use crate::kernel::CortexKernel;

pub struct ReflectParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
}

impl CortexKernel {
    pub async fn trigger_consolidation(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        scope: ConsolidationScope,
    ) -> CortexResult<ConsolidationResult> {
        let scope_key = cortex_core::ids::AgentScope::new(tenant_id, agent_id);
        let _guard = self.locks.acquire(scope_key).await;
        let result = self.consolidation.run(tenant_id, agent_id, scope).await?;
        self.metrics.consolidation_runs.incr();
        Ok(result)
    }

    pub async fn run_decay_pass(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<DecayResult> {
        let scope_key = cortex_core::ids::AgentScope::new(tenant_id, agent_id);
        let _guard = self.locks.acquire(scope_key).await;
        let result = self.decay.run(tenant_id, agent_id).await?;
        self.metrics.decay_runs.incr();
        Ok(result)
    }

    pub async fn explain_confidence(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_id: MemoryId,
    ) -> CortexResult<ConfidenceExplanation> {
        self.metacognition.explain_confidence(tenant_id, agent_id, memory_id).await
    }

    pub async fn uncertainty_report(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<UncertaintyReport> {
        self.metacognition.uncertainty_report(tenant_id, agent_id).await
    }

    pub async fn reflect(&self, params: ReflectParams) -> CortexResult<StrategyReflection> {
        self.metacognition.reflect_on_strategies(params.tenant_id, params.agent_id).await
    }
}
