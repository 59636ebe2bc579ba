use crate::ids::{AgentId, TenantId};
use crate::models::MemoryTypePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An agent belongs to exactly one tenant; `(tenant_id, external_id)` is
/// unique (§3 Agent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub tenant_id: TenantId,
    pub external_id: String,
    pub name: String,
    pub metadata: HashMap<String, serde_json::Value>,
    /// Per-type retention overrides (§6 `/v1/agents/{id}/policies`). Empty
    /// means "use the deployment's `PolicyConfig` defaults".
    pub policies: Vec<MemoryTypePolicy>,
}

impl Agent {
    pub fn new(tenant_id: TenantId, external_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: AgentId::new(),
            tenant_id,
            external_id: external_id.into(),
            name: name.into(),
            metadata: HashMap::new(),
            policies: Vec::new(),
        }
    }
}
