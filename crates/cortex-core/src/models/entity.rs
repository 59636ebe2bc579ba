use crate::ids::{AgentId, EntityId, MemoryId, TenantId};
use serde::{Deserialize, Serialize};

/// §3 Entity `entity_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Organization,
    Tool,
    Concept,
    Location,
    Event,
    Product,
    Other,
}

/// §3 Entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub name: String,
    pub entity_type: EntityType,
    pub aliases: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl Entity {
    pub fn new(tenant_id: TenantId, agent_id: AgentId, name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: EntityId::new(),
            tenant_id,
            agent_id,
            name: name.into(),
            entity_type,
            aliases: Vec::new(),
            embedding: None,
        }
    }
}

/// §3 Mention `mention_type` — weight used when building entity-link edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionType {
    Subject,
    Object,
    Context,
}

/// §3 Mention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub entity_id: EntityId,
    pub memory_id: MemoryId,
    pub mention_type: MentionType,
}
