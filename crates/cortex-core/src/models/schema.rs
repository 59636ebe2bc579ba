use crate::ids::{AgentId, EpisodeId, MemoryId, SchemaId, TenantId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// §3 Schema `schema_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaType {
    UserArchetype,
    SituationTemplate,
    CausalModel,
}

/// §3 Schema (mental model). Invariant: `evidence_count` equals the sum of
/// the evidence array lengths after any mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub id: SchemaId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub schema_type: SchemaType,
    /// Unique per `(agent, schema_type)`.
    pub name: String,
    pub description: String,
    pub attributes: HashMap<String, serde_json::Value>,
    pub evidence_memories: Vec<MemoryId>,
    pub evidence_episodes: Vec<EpisodeId>,
    pub evidence_count: u64,
    pub confidence: f64,
    pub contradiction_count: u64,
    pub applicable_contexts: Vec<String>,
    pub embedding: Option<Vec<f32>>,
}

impl Schema {
    pub fn new(
        tenant_id: TenantId,
        agent_id: AgentId,
        schema_type: SchemaType,
        name: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id: SchemaId::new(),
            tenant_id,
            agent_id,
            schema_type,
            name: name.into(),
            description: description.into(),
            attributes: HashMap::new(),
            evidence_memories: Vec::new(),
            evidence_episodes: Vec::new(),
            evidence_count: 0,
            confidence,
            contradiction_count: 0,
            applicable_contexts: Vec::new(),
            embedding: None,
        }
    }

    /// Recompute `evidence_count` from the evidence arrays — call after any
    /// mutation to the evidence vectors to preserve the §3 invariant.
    pub fn recompute_evidence_count(&mut self) {
        self.evidence_count =
            (self.evidence_memories.len() + self.evidence_episodes.len()) as u64;
    }

    pub fn add_memory_evidence(&mut self, id: MemoryId) {
        if !self.evidence_memories.contains(&id) {
            self.evidence_memories.push(id);
            self.recompute_evidence_count();
        }
    }

    pub fn add_episode_evidence(&mut self, id: EpisodeId) {
        if !self.evidence_episodes.contains(&id) {
            self.evidence_episodes.push(id);
            self.recompute_evidence_count();
        }
    }
}
