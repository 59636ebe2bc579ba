//! §3 Procedure (learned skill), §6 `/v1/procedures`.

use cortex_confidence::arithmetic;
use cortex_core::constants::PROCEDURE_MATCH_THRESHOLD;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, ProcedureId, TenantId};
use cortex_core::models::{Outcome, Procedure};

use crate::kernel::CortexKernel;

pub struct MatchProceduresParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub cues: String,
    pub top_k: usize,
}

pub struct LearnProcedureParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub trigger_pattern: String,
    pub trigger_keywords: Vec<String>,
    pub action_template: String,
    pub action_type: String,
}

pub struct RecordProcedureOutcomeParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub procedure_id: ProcedureId,
    pub outcome: Outcome,
}

impl CortexKernel {
    /// §4.4 procedure matching: embed the cues, rank by similarity to
    /// `trigger_embedding`, keep hits at or above the fixed match threshold.
    pub async fn match_procedures(&self, params: MatchProceduresParams) -> CortexResult<Vec<(Procedure, f64)>> {
        let embedding = self.embeddings.embed(&params.cues).await?;
        let hits = self
            .procedures
            .vector_search(params.tenant_id, params.agent_id, &embedding, params.top_k)
            .await?;

        let mut matched = Vec::with_capacity(hits.len());
        for hit in hits {
            if hit.similarity < PROCEDURE_MATCH_THRESHOLD {
                continue;
            }
            let procedure = self.procedures.get(params.tenant_id, params.agent_id, hit.id).await?;
            matched.push((procedure, hit.similarity));
        }
        Ok(matched)
    }

    pub async fn learn_procedure(&self, params: LearnProcedureParams) -> CortexResult<Procedure> {
        let mut procedure = Procedure::new(
            params.tenant_id,
            params.agent_id,
            params.trigger_pattern,
            params.action_template,
            params.action_type,
        );
        procedure.trigger_keywords = params.trigger_keywords;
        procedure.trigger_embedding = self.embeddings.embed(&procedure.trigger_pattern).await.ok();
        self.procedures.upsert(procedure).await
    }

    /// Records a use and adjusts confidence the same way memory confidence
    /// moves under explicit feedback (§4.1 Reinforce/Penalize), since
    /// procedures share the same bounded-confidence model as memories.
    pub async fn record_procedure_outcome(&self, params: RecordProcedureOutcomeParams) -> CortexResult<Procedure> {
        let mut procedure = self
            .procedures
            .get(params.tenant_id, params.agent_id, params.procedure_id)
            .await?;
        procedure.record_use(params.outcome);
        procedure.confidence = match params.outcome {
            Outcome::Success => arithmetic::reinforce(procedure.confidence),
            Outcome::Failure => arithmetic::penalize(procedure.confidence),
            Outcome::Neutral | Outcome::Unknown => procedure.confidence,
        };
        self.procedures.upsert(procedure).await
    }
}
