//! `POST /v1/feedback` — explicit feedback signals (§6, §4.9).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use cortex_core::ids::{AgentId, MemoryId};
use cortex_core::models::{FeedbackSignalType, Memory};
use cortex_kernel::SubmitFeedbackParams;

use crate::auth::AuthenticatedTenant;
use crate::error::ApiResult;
use crate::routes::util::parse_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitFeedbackRequest {
    pub agent_id: String,
    pub memory_id: String,
    pub signal: FeedbackSignalType,
    pub context: Option<String>,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    AuthenticatedTenant(tenant): AuthenticatedTenant,
    Json(body): Json<SubmitFeedbackRequest>,
) -> ApiResult<Json<Memory>> {
    let agent_id: AgentId = parse_id(&body.agent_id, AgentId::parse)?;
    let memory_id: MemoryId = parse_id(&body.memory_id, MemoryId::parse)?;
    let memory = state
        .kernel
        .submit_feedback(SubmitFeedbackParams {
            tenant_id: tenant.id,
            agent_id,
            memory_id,
            signal_type: body.signal,
            context: body.context,
        })
        .await?;
    Ok(Json(memory))
}
