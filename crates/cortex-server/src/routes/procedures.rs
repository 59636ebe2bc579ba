//! `/v1/procedures` — procedural memory match/learn/outcome (§6, §3 Procedure).

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use cortex_core::ids::{AgentId, ProcedureId};
use cortex_core::models::{Outcome, Procedure};
use cortex_kernel::{LearnProcedureParams, MatchProceduresParams, RecordProcedureOutcomeParams};

use crate::auth::AuthenticatedTenant;
use crate::error::ApiResult;
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchProceduresRequest {
    pub agent_id: String,
    pub cues: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

#[derive(Serialize)]
pub struct ProcedureMatch {
    pub procedure: Procedure,
    pub score: f64,
}

pub async fn match_procedures(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<MatchProceduresRequest>,
) -> ApiResult<Json<Vec<ProcedureMatch>>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let matches = state
        .kernel
        .match_procedures(MatchProceduresParams { tenant_id: tenant.id, agent_id, cues: body.cues, top_k: body.top_k })
        .await?;
    Ok(Json(matches.into_iter().map(|(procedure, score)| ProcedureMatch { procedure, score }).collect()))
}

#[derive(Deserialize)]
pub struct LearnProcedureRequest {
    pub agent_id: String,
    pub trigger_pattern: String,
    #[serde(default)]
    pub trigger_keywords: Vec<String>,
    pub action_template: String,
    pub action_type: String,
}

pub async fn learn_procedure(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<LearnProcedureRequest>,
) -> ApiResult<Json<Procedure>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let procedure = state
        .kernel
        .learn_procedure(LearnProcedureParams {
            tenant_id: tenant.id,
            agent_id,
            trigger_pattern: body.trigger_pattern,
            trigger_keywords: body.trigger_keywords,
            action_template: body.action_template,
            action_type: body.action_type,
        })
        .await?;
    Ok(Json(procedure))
}

#[derive(Deserialize)]
pub struct RecordProcedureOutcomeRequest {
    pub agent_id: String,
    pub outcome: Outcome,
}

pub async fn record_outcome(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Json(body): Json<RecordProcedureOutcomeRequest>,
) -> ApiResult<Json<Procedure>> {
    let id: ProcedureId = parse_id(&id, ProcedureId::parse)?;
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let procedure = state
        .kernel
        .record_procedure_outcome(RecordProcedureOutcomeParams {
            tenant_id: tenant.id,
            agent_id,
            procedure_id: id,
            outcome: body.outcome,
        })
        .await?;
    Ok(Json(procedure))
}
