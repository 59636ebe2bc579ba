//! `/v1/schemas` — mental-model lifecycle (§6, §3 Schema).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use cortex_consolidation::schema::SchemaOutcome;
use cortex_core::ids::{AgentId, SchemaId};
use cortex_core::models::Schema;
use cortex_kernel::{ContradictSchemaParams, MatchSchemasParams};

use crate::auth::AuthenticatedTenant;
use crate::error::ApiResult;
use crate::routes::memories::AgentScopedQuery;
use crate::routes::util::parse_id;
use crate::state::AppState;

pub async fn list_schemas(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<Vec<Schema>>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let schemas = state.kernel.list_schemas(tenant.id, agent_id).await?;
    Ok(Json(schemas))
}

#[derive(Deserialize)]
pub struct MatchSchemasRequest {
    pub agent_id: String,
    pub query: String,
    #[serde(default)]
    pub input_contexts: Vec<String>,
    pub time_of_day: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    3
}

#[derive(Serialize)]
pub struct SchemaMatch {
    pub schema: Schema,
    pub score: f64,
}

pub async fn match_schemas(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<MatchSchemasRequest>,
) -> ApiResult<Json<Vec<SchemaMatch>>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let matches = state
        .kernel
        .match_schemas(MatchSchemasParams {
            tenant_id: tenant.id,
            agent_id,
            query: body.query,
            input_contexts: body.input_contexts,
            time_of_day: body.time_of_day,
            limit: body.limit,
        })
        .await?;
    Ok(Json(matches.into_iter().map(|(schema, score)| SchemaMatch { schema, score }).collect()))
}

pub async fn detect_schemas(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<SchemaOutcome>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let outcome = state.kernel.detect_schemas(tenant.id, agent_id).await?;
    Ok(Json(outcome))
}

pub async fn contradict_schema(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<Schema>> {
    let id: SchemaId = parse_id(&id, SchemaId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let schema = state
        .kernel
        .contradict_schema(ContradictSchemaParams { tenant_id: tenant.id, agent_id, schema_id: id })
        .await?;
    Ok(Json(schema))
}

pub async fn validate_schema(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<Schema>> {
    let id: SchemaId = parse_id(&id, SchemaId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let schema = state.kernel.validate_schema(tenant.id, agent_id, id).await?;
    Ok(Json(schema))
}

pub async fn delete_schema(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<()> {
    let id: SchemaId = parse_id(&id, SchemaId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    state.kernel.delete_schema(tenant.id, agent_id, id).await?;
    Ok(())
}
