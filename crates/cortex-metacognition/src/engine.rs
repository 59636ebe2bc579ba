use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::traits::{ContradictionStore, MemoryStore, MutationLogStore, ProcedureStore, SchemaStore};

use crate::explain::{explain_confidence, ConfidenceExplanation};
use crate::reflection::{reflect_on_strategies, StrategyReflection};
use crate::uncertainty::{uncertainty_report, UncertaintyReport};

/// Facade over the three metacognitive operations (`reflect|confidence|
/// uncertainty`), wiring the read-only stores each one needs.
pub struct MetacognitionEngine {
    memories: Arc<dyn MemoryStore>,
    mutation_log: Arc<dyn MutationLogStore>,
    contradictions: Arc<dyn ContradictionStore>,
    schemas: Arc<dyn SchemaStore>,
    procedures: Arc<dyn ProcedureStore>,
}

impl MetacognitionEngine {
    pub fn new(
        memories: Arc<dyn MemoryStore>,
        mutation_log: Arc<dyn MutationLogStore>,
        contradictions: Arc<dyn ContradictionStore>,
        schemas: Arc<dyn SchemaStore>,
        procedures: Arc<dyn ProcedureStore>,
    ) -> Self {
        Self { memories, mutation_log, contradictions, schemas, procedures }
    }

    pub async fn explain_confidence(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_id: MemoryId,
    ) -> CortexResult<ConfidenceExplanation> {
        explain_confidence(&self.memories, &self.mutation_log, tenant_id, agent_id, memory_id).await
    }

    pub async fn uncertainty_report(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
    ) -> CortexResult<UncertaintyReport> {
        uncertainty_report(&self.memories, &self.contradictions, &self.schemas, tenant_id, agent_id).await
    }

    pub async fn reflect_on_strategies(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
    ) -> CortexResult<StrategyReflection> {
        reflect_on_strategies(&self.procedures, tenant_id, agent_id).await
    }
}
