//! `/v1/episodes` — episode lifecycle (§6, §3 Episode).

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use cortex_core::ids::{AgentId, EpisodeId};
use cortex_core::models::{Episode, Outcome};
use cortex_kernel::{EncodeEpisodeParams, RecallEpisodesParams, RecordEpisodeOutcomeParams};

use crate::auth::AuthenticatedTenant;
use crate::error::ApiResult;
use crate::routes::memories::AgentScopedQuery;
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EncodeEpisodeRequest {
    pub agent_id: String,
    pub raw_content: String,
    #[serde(default = "Utc::now")]
    pub occurred_at: DateTime<Utc>,
    pub conversation_id: Option<String>,
    pub message_sequence: Option<u64>,
}

pub async fn encode_episode(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<EncodeEpisodeRequest>,
) -> ApiResult<Json<Episode>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let episode = state
        .kernel
        .encode_episode(EncodeEpisodeParams {
            tenant_id: tenant.id,
            agent_id,
            raw_content: body.raw_content,
            occurred_at: body.occurred_at,
            conversation_id: body.conversation_id,
            message_sequence: body.message_sequence,
        })
        .await?;
    Ok(Json(episode))
}

pub async fn get_episode(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Query(q): Query<AgentScopedQuery>,
) -> ApiResult<Json<Episode>> {
    let id: EpisodeId = parse_id(&id, EpisodeId::parse)?;
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let episode = state.kernel.get_episode(tenant.id, agent_id, id).await?;
    Ok(Json(episode))
}

#[derive(Deserialize)]
pub struct RecordOutcomeRequest {
    pub agent_id: String,
    pub outcome: Outcome,
}

pub async fn record_outcome(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Path(id): Path<String>,
    Json(body): Json<RecordOutcomeRequest>,
) -> ApiResult<Json<Episode>> {
    let id: EpisodeId = parse_id(&id, EpisodeId::parse)?;
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let episode = state
        .kernel
        .record_episode_outcome(RecordEpisodeOutcomeParams {
            tenant_id: tenant.id,
            agent_id,
            episode_id: id,
            outcome: body.outcome,
        })
        .await?;
    Ok(Json(episode))
}

#[derive(Deserialize)]
pub struct RecallEpisodesQuery {
    pub agent_id: String,
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    10
}

pub async fn recall_episodes(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Query(q): Query<RecallEpisodesQuery>,
) -> ApiResult<Json<Vec<Episode>>> {
    let agent_id: AgentId = parse_id(&q.agent_id, AgentId::parse)?;
    let episodes = state
        .kernel
        .recall_episodes(RecallEpisodesParams { tenant_id: tenant.id, agent_id, query: q.query, top_k: q.top_k })
        .await?;
    Ok(Json(episodes))
}
