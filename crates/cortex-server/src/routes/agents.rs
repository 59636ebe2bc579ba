//! `/v1/agents` — agent directory, per-agent policies, and the mind
//! snapshot (§6).

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use cortex_core::ids::AgentId;
use cortex_core::models::{Agent, MemoryTypePolicy};
use cortex_kernel::{CreateAgentParams, MindSnapshot, PoliciesParams};

use crate::auth::AuthenticatedTenant;
use crate::error::ApiResult;
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateAgentRequest {
    pub external_id: String,
    pub name: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

pub async fn create_agent(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<CreateAgentRequest>,
) -> ApiResult<Json<Agent>> {
    let agent = state
        .kernel
        .create_agent(CreateAgentParams {
            tenant_id: tenant.id,
            external_id: body.external_id,
            name: body.name,
            metadata: body.metadata,
        })
        .await?;
    Ok(Json(agent))
}

pub async fn get_agent(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
) -> ApiResult<Json<Agent>> {
    let id: AgentId = parse_id(&id, AgentId::parse)?;
    let agent = state.kernel.get_agent(tenant.id, id).await?;
    Ok(Json(agent))
}

pub async fn get_policies(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MemoryTypePolicy>>> {
    let id: AgentId = parse_id(&id, AgentId::parse)?;
    let policies = state.kernel.get_policies(tenant.id, id).await?;
    Ok(Json(policies))
}

pub async fn put_policies(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Json(policies): Json<Vec<MemoryTypePolicy>>,
) -> ApiResult<Json<Agent>> {
    let id: AgentId = parse_id(&id, AgentId::parse)?;
    let agent = state
        .kernel
        .put_policies(PoliciesParams { tenant_id: tenant.id, agent_id: id, policies })
        .await?;
    Ok(Json(agent))
}

pub async fn mind(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
) -> ApiResult<Json<MindSnapshot>> {
    let id: AgentId = parse_id(&id, AgentId::parse)?;
    let snapshot = state.kernel.mind(tenant.id, id).await?;
    Ok(Json(snapshot))
}
