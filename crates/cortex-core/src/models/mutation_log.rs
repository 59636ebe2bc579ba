use crate::ids::MemoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// §3 Mutation log entry `mutation_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    Reinforce,
    Penalize,
    Decay,
    TierChange,
    Supersede,
    Expire,
}

/// §3 Mutation log entry `source_type` — who triggered the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationSourceType {
    Explicit,
    Implicit,
    System,
}

/// §3 Mutation log entry — append-only audit trail for every confidence or
/// reinforcement-count change applied to a memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationLogEntry {
    pub memory_id: MemoryId,
    pub mutation_type: MutationType,
    pub source_type: MutationSourceType,
    pub source_id: Option<String>,
    pub old_confidence: f64,
    pub new_confidence: f64,
    pub old_reinforcement_count: u64,
    pub new_reinforcement_count: u64,
    pub reason: String,
    pub metadata: std::collections::HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl MutationLogEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        memory_id: MemoryId,
        mutation_type: MutationType,
        source_type: MutationSourceType,
        source_id: Option<String>,
        old_confidence: f64,
        new_confidence: f64,
        old_reinforcement_count: u64,
        new_reinforcement_count: u64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            memory_id,
            mutation_type,
            source_type,
            source_id,
            old_confidence,
            new_confidence,
            old_reinforcement_count,
            new_reinforcement_count,
            reason: reason.into(),
            metadata: std::collections::HashMap::new(),
            created_at: Utc::now(),
        }
    }
}
