//! Agent directory and per-agent policy overrides (§3 Agent, §6
//! `/v1/agents`).

use std::collections::HashMap;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{Agent, MemoryTypePolicy};

use crate::kernel::CortexKernel;

pub struct CreateAgentParams {
    pub tenant_id: TenantId,
    pub external_id: String,
    pub name: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

pub struct PoliciesParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub policies: Vec<MemoryTypePolicy>,
}

impl CortexKernel {
    /// `AgentStore` has no update method, so re-registering an `external_id`
    /// already owned by a different agent is a conflict rather than an
    /// upsert (§3 Agent "unique per tenant").
    pub async fn create_agent(&self, params: CreateAgentParams) -> CortexResult<Agent> {
        if let Some(existing) = self
            .agents
            .find_by_external_id(params.tenant_id, &params.external_id)
            .await?
        {
            return Err(CortexError::Conflict {
                message: format!("agent with external_id {} already exists as {}", params.external_id, existing.id),
            });
        }

        let mut agent = Agent::new(params.tenant_id, params.external_id, params.name);
        agent.metadata = params.metadata;
        self.agents.create(agent).await
    }

    pub async fn get_agent(&self, tenant_id: TenantId, id: AgentId) -> CortexResult<Agent> {
        self.agents.get(tenant_id, id).await
    }

    pub async fn get_policies(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<MemoryTypePolicy>> {
        let agent = self.agents.get(tenant_id, agent_id).await?;
        if agent.policies.is_empty() {
            Ok(self.config.policy.type_policies.clone())
        } else {
            Ok(agent.policies)
        }
    }

    /// `AgentStore::create` is keyed by id, so re-submitting an existing
    /// agent acts as an update — there is no separate update method.
    pub async fn put_policies(&self, params: PoliciesParams) -> CortexResult<Agent> {
        let mut agent = self.agents.get(params.tenant_id, params.agent_id).await?;
        agent.policies = params.policies;
        self.agents.create(agent).await
    }
}
