//! §4.4 Working-memory activation and session management (§6
//! `/v1/agents/{id}/activate`, `/v1/sessions`).

use std::time::Instant;

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::WorkingMemorySession;
use cortex_session::{ActivationOutcome, ActivationRequest};

use crate::kernel::CortexKernel;

pub struct ActivateParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub goal: Option<String>,
    pub cues: Vec<String>,
    pub context: Vec<String>,
    pub deadline: Option<Instant>,
}

pub struct SetGoalParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub goal: String,
}

impl CortexKernel {
    pub async fn activate(&self, params: ActivateParams) -> CortexResult<ActivationOutcome> {
        let scope = cortex_core::ids::AgentScope::new(params.tenant_id, params.agent_id);
        let _guard = self.locks.acquire(scope).await;

        self.activation
            .activate(
                ActivationRequest {
                    tenant_id: params.tenant_id,
                    agent_id: params.agent_id,
                    goal: params.goal,
                    cues: params.cues,
                    context: params.context,
                },
                params.deadline,
            )
            .await
    }

    pub async fn get_session(&self, tenant_id: TenantId, agent_id: AgentId, max_slots: usize) -> CortexResult<WorkingMemorySession> {
        self.sessions.get_or_create(tenant_id, agent_id, max_slots).await
    }

    pub async fn set_goal(&self, params: SetGoalParams) -> CortexResult<WorkingMemorySession> {
        let scope = cortex_core::ids::AgentScope::new(params.tenant_id, params.agent_id);
        let _guard = self.locks.acquire(scope).await;

        let mut session = self
            .sessions
            .get_or_create(params.tenant_id, params.agent_id, self.config.session.max_slots)
            .await?;
        session.current_goal = Some(params.goal);
        self.sessions.save(session).await
    }
}
