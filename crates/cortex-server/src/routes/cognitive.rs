//! `/v1/cognitive/*` — working memory and metacognition (§6, §4.4, §4.10).

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use cortex_consolidation::{ConsolidationResult, ConsolidationScope};
use cortex_core::errors::CortexError;
use cortex_core::ids::{AgentId, MemoryId};
use cortex_core::models::WorkingMemorySession;
use cortex_decay::DecayResult;
use cortex_kernel::{ActivateParams, ReflectParams, SetGoalParams};
use cortex_metacognition::explain::ConfidenceExplanation;
use cortex_metacognition::reflection::StrategyReflection;
use cortex_metacognition::uncertainty::UncertaintyReport;
use cortex_session::ActivationOutcome;

use crate::auth::AuthenticatedTenant;
use crate::error::{ApiError, ApiResult};
use crate::routes::memories::AgentScopedQuery;
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ActivateRequest {
    pub agent_id: String,
    pub goal: Option<String>,
    #[serde(default)]
    pub cues: Vec<String>,
    #[serde(default)]
    pub context: Vec<String>,
    pub deadline_ms: Option<u64>,
}

pub async fn activate(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<ActivateRequest>,
) -> ApiResult<Json<ActivationOutcome>> {
    if body.goal.is_none() && body.cues.is_empty() {
        return Err(ApiError(CortexError::BadRequest {
            message: "activate requires a goal or at least one cue".to_string(),
        }));
    }
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let deadline = body.deadline_ms.map(|ms| Instant::now() + std::time::Duration::from_millis(ms));
    let outcome = state
        .kernel
        .activate(ActivateParams {
            tenant_id: tenant.id,
            agent_id,
            goal: body.goal,
            cues: body.cues,
            context: body.context,
            deadline,
        })
        .await?;
    Ok(Json(outcome))
}

pub async fn get_session(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<WorkingMemorySession>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let max_slots = state.kernel.config().session.max_slots;
    let session = state.kernel.get_session(tenant.id, agent_id, max_slots).await?;
    Ok(Json(session))
}

#[derive(Deserialize)]
pub struct SetGoalRequest {
    pub agent_id: String,
    pub goal: String,
}

pub async fn set_goal(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<SetGoalRequest>,
) -> ApiResult<Json<WorkingMemorySession>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let session = state
        .kernel
        .set_goal(SetGoalParams { tenant_id: tenant.id, agent_id, goal: body.goal })
        .await?;
    Ok(Json(session))
}

pub async fn run_decay(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<DecayResult>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let result = state.kernel.run_decay_pass(tenant.id, agent_id).await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct ConsolidateRequest {
    pub agent_id: String,
    #[serde(default = "default_scope")]
    pub scope: ConsolidationScope,
}

fn default_scope() -> ConsolidationScope {
    ConsolidationScope::Recent
}

pub async fn consolidate(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<ConsolidateRequest>,
) -> ApiResult<Json<ConsolidationResult>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let result = state.kernel.trigger_consolidation(tenant.id, agent_id, body.scope).await?;
    Ok(Json(result))
}

pub async fn reflect(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<StrategyReflection>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let reflection = state.kernel.reflect(ReflectParams { tenant_id: tenant.id, agent_id }).await?;
    Ok(Json(reflection))
}

pub async fn explain_confidence(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(memory_id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<ConfidenceExplanation>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let memory_id: MemoryId = parse_id(&memory_id, MemoryId::parse)?;
    let explanation = state.kernel.explain_confidence(tenant.id, agent_id, memory_id).await?;
    Ok(Json(explanation))
}

pub async fn uncertainty(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<UncertaintyReport>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let report = state.kernel.uncertainty_report(tenant.id, agent_id).await?;
    Ok(Json(report))
}
