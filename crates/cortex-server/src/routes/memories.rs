//! `/v1/memories` — creation/dedup, fetch, delete, hybrid recall, and
//! conversation extraction (§6, §4.2, §4.3).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use cortex_core::ids::{AgentId, MemoryId};
use cortex_core::models::{Memory, MemoryType, Provenance};
use cortex_core::traits::CandidateMemory;
use cortex_kernel::{CreateMemoryParams, ExtractCandidatesParams, RecallParams};
use cortex_retrieval::RecallHit;

use crate::auth::AuthenticatedTenant;
use crate::error::{ApiError, ApiResult};
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMemoryRequest {
    pub agent_id: String,
    pub memory_type: MemoryType,
    pub content: String,
    #[serde(default = "default_provenance")]
    pub provenance: Provenance,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_provenance() -> Provenance {
    Provenance::User
}

fn default_confidence() -> f64 {
    0.6
}

#[derive(Serialize)]
pub struct CreateMemoryResponse {
    pub memory: Memory,
    pub reinforced: bool,
}

pub async fn create_memory(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<CreateMemoryRequest>,
) -> ApiResult<Json<CreateMemoryResponse>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let outcome = state
        .kernel
        .create_memory(CreateMemoryParams {
            tenant_id: tenant.id,
            agent_id,
            memory_type: body.memory_type,
            content: body.content,
            provenance: body.provenance,
            confidence: body.confidence,
            expires_at: body.expires_at,
        })
        .await?;
    Ok(Json(CreateMemoryResponse { memory: outcome.memory, reinforced: outcome.reinforced }))
}

#[derive(Deserialize)]
pub struct AgentScopedQuery {
    pub agent_id: String,
}

pub async fn get_memory(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<Memory>> {
    let id: MemoryId = parse_id(&id, MemoryId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let memory = state.kernel.get_memory(tenant.id, agent_id, id).await?;
    Ok(Json(memory))
}

pub async fn delete_memory(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<()> {
    let id: MemoryId = parse_id(&id, MemoryId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    state.kernel.delete_memory(tenant.id, agent_id, id).await?;
    Ok(())
}

#[derive(Deserialize)]
pub struct RecallQuery {
    pub agent_id: String,
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_vector_weight")]
    pub vector_weight: f64,
    #[serde(default = "default_graph_weight")]
    pub graph_weight: f64,
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
    #[serde(default = "default_use_graph")]
    pub use_graph: bool,
    pub memory_type: Option<MemoryType>,
    #[serde(default)]
    pub min_confidence: f64,
}

fn default_top_k() -> usize {
    10
}
fn default_vector_weight() -> f64 {
    0.7
}
fn default_graph_weight() -> f64 {
    0.3
}
fn default_max_hops() -> u32 {
    2
}
fn default_use_graph() -> bool {
    true
}

pub async fn recall(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<RecallQuery>,
) -> ApiResult<Json<Vec<RecallHit>>> {
    if q.query.trim().is_empty() {
        return Err(ApiError(cortex_core::errors::CortexError::BadRequest {
            message: "query must not be empty".to_string(),
        }));
    }
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let hits = state
        .kernel
        .recall(RecallParams {
            tenant_id: tenant.id,
            agent_id,
            query: q.query,
            top_k: q.top_k,
            vector_weight: q.vector_weight,
            graph_weight: q.graph_weight,
            max_hops: q.max_hops,
            use_graph: q.use_graph,
            memory_type: q.memory_type,
            min_confidence: q.min_confidence,
            fallback_seed_ids: Vec::new(),
        })
        .await?;
    Ok(Json(hits))
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub conversation: String,
}

pub async fn extract(
    State(state): State<AppState>,
    AuthenticatedTenant(_tenant): AuthenticatedTenant,
    Json(body): Json<ExtractRequest>,
) -> ApiResult<Json<Vec<CandidateMemory>>> {
    let candidates = state.kernel.extract_candidates(ExtractCandidatesParams { conversation: body.conversation }).await?;
    Ok(Json(candidates))
}
