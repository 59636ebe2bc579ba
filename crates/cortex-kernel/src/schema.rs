//! §3 Schema (mental model), §6 `/v1/schemas`.

use cortex_consolidation::schema::SchemaOutcome;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, SchemaId, TenantId};
use cortex_core::models::Schema;
use cortex_session::schema_match::match_schemas;

use crate::kernel::CortexKernel;

pub struct MatchSchemasParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub query: String,
    pub input_contexts: Vec<String>,
    pub time_of_day: Option<String>,
    pub limit: usize,
}

pub struct ContradictSchemaParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub schema_id: SchemaId,
}

impl CortexKernel {
    pub async fn list_schemas(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Schema>> {
        self.schemas.list(tenant_id, agent_id).await
    }

    pub async fn match_schemas(&self, params: MatchSchemasParams) -> CortexResult<Vec<(Schema, f64)>> {
        let schemas = self.schemas.list(params.tenant_id, params.agent_id).await?;
        let embedding = self.embeddings.embed(&params.query).await.ok();
        Ok(match_schemas(
            &schemas,
            embedding.as_deref(),
            &params.input_contexts,
            params.time_of_day.as_deref(),
            params.limit,
        ))
    }

    /// On-demand detection for `/v1/schemas/detect`, distinct from the
    /// full consolidation pass — calls the same free function the pipeline
    /// uses for its step 5 directly.
    pub async fn detect_schemas(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<SchemaOutcome> {
        cortex_consolidation::schema::detect_schemas(
            self.reasoner.as_ref(),
            &self.memories,
            &self.episodes,
            &self.schemas,
            &self.config.consolidation,
            tenant_id,
            agent_id,
        )
        .await
    }

    /// Increments the contradiction counter and penalizes confidence the
    /// same way a contradicted memory is penalized (§4.1 Penalize).
    pub async fn contradict_schema(&self, params: ContradictSchemaParams) -> CortexResult<Schema> {
        let mut schema = self.schemas.get(params.tenant_id, params.agent_id, params.schema_id).await?;
        schema.contradiction_count += 1;
        schema.confidence = cortex_confidence::arithmetic::penalize(schema.confidence);
        self.schemas.upsert(schema).await
    }

    /// Re-derives `evidence_count` from the evidence arrays, preserving the
    /// §3 invariant after any external mutation to the evidence lists.
    pub async fn validate_schema(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<Schema> {
        let mut schema = self.schemas.get(tenant_id, agent_id, id).await?;
        schema.recompute_evidence_count();
        self.schemas.upsert(schema).await
    }

    pub async fn delete_schema(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<()> {
        self.schemas.delete(tenant_id, agent_id, id).await
    }
}
