use crate::ids::{AgentId, MemoryId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// §3 Memory (semantic belief) `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    Preference,
    Fact,
    Decision,
    Constraint,
}

/// §3 Memory `provenance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    User,
    Agent,
    Tool,
    Derived,
    Inferred,
}

/// A pure function of confidence (§3 "Tiers") — never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Hot,
    Warm,
    Cold,
    Archive,
}

/// The unit of persistent knowledge (§3 Memory).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    pub id: MemoryId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub memory_type: MemoryType,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub provenance: Provenance,
    /// Invariant: always in `[0, 0.99]` after every mutation.
    pub confidence: f64,
    /// Invariant: monotone per Reinforce call; may decrease under Penalize
    /// down to 0.
    pub reinforcement_count: u64,
    /// Per-day decay rate used by the confidence engine's time decay.
    pub decay_rate: f64,
    pub last_verified_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    /// Count of consecutive decay passes this memory has spent at the
    /// `Archive` tier (§4.8); two in a row is terminal.
    pub consecutive_archive_passes: u32,
}

impl Memory {
    pub fn new(
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_type: MemoryType,
        content: impl Into<String>,
        provenance: Provenance,
        confidence: f64,
        decay_rate: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: MemoryId::new(),
            tenant_id,
            agent_id,
            memory_type,
            content: content.into(),
            embedding: None,
            provenance,
            confidence: confidence.clamp(
                crate::constants::CONFIDENCE_MIN,
                crate::constants::CONFIDENCE_MAX,
            ),
            reinforcement_count: 0,
            decay_rate,
            last_verified_at: now,
            last_accessed_at: now,
            access_count: 0,
            expires_at: None,
            metadata: HashMap::new(),
            created_at: now,
            consecutive_archive_passes: 0,
        }
    }

    /// Pure function of confidence (§3 "Tiers").
    pub fn tier(&self) -> Tier {
        crate::constants::tier(self.confidence)
    }
}
