use crate::ids::{AgentId, EpisodeId, MemoryId, ProcedureId, TenantId};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// §3 Episode `outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    Neutral,
    Unknown,
}

/// §3 Episode `consolidation_status`. Transitions are monotonic in this
/// listed order and never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStatus {
    Raw,
    Processed,
    Abstracted,
    Archived,
}

impl ConsolidationStatus {
    /// True if `next` is a legal (non-regressing) transition from `self`.
    pub fn can_advance_to(self, next: ConsolidationStatus) -> bool {
        next >= self
    }
}

/// A causal link extracted from an episode (§3 Episode `causal_links[]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CausalLink {
    pub cause: String,
    pub effect: String,
    pub confidence: f64,
}

/// §3 Episode (raw experience).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub raw_content: String,
    pub conversation_id: Option<String>,
    pub message_sequence: Option<u64>,
    pub occurred_at: DateTime<Utc>,
    pub duration_seconds: Option<u64>,
    pub valence: f64,
    pub intensity: f64,
    pub importance_score: f64,
    pub entities: Vec<String>,
    pub topics: Vec<String>,
    pub causal_links: Vec<CausalLink>,
    pub outcome: Option<Outcome>,
    pub consolidation_status: ConsolidationStatus,
    /// Floor-clamped at 0; archive is terminal.
    pub memory_strength: f64,
    pub derived_semantic_ids: Vec<MemoryId>,
    pub derived_procedural_ids: Vec<ProcedureId>,
    pub embedding: Option<Vec<f32>>,
    pub last_accessed_at: DateTime<Utc>,
}

impl Episode {
    pub fn new(
        tenant_id: TenantId,
        agent_id: AgentId,
        raw_content: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EpisodeId::new(),
            tenant_id,
            agent_id,
            raw_content: raw_content.into(),
            conversation_id: None,
            message_sequence: None,
            occurred_at,
            duration_seconds: None,
            valence: 0.0,
            intensity: 0.0,
            importance_score: 0.0,
            entities: Vec::new(),
            topics: Vec::new(),
            causal_links: Vec::new(),
            outcome: None,
            consolidation_status: ConsolidationStatus::Raw,
            memory_strength: 1.0,
            derived_semantic_ids: Vec::new(),
            derived_procedural_ids: Vec::new(),
            embedding: None,
            last_accessed_at: occurred_at,
        }
    }

    /// Derived `time_of_day` bucket (§3 Episode).
    pub fn time_of_day(&self) -> &'static str {
        match self.occurred_at.hour() {
            5..=11 => "morning",
            12..=16 => "afternoon",
            17..=20 => "evening",
            _ => "night",
        }
    }

    /// Derived `day_of_week`.
    pub fn day_of_week(&self) -> chrono::Weekday {
        self.occurred_at.weekday()
    }

    /// Attempt to advance the status; returns `false` (no-op) if `next`
    /// would regress — enforces the monotonicity invariant at the call
    /// site instead of trusting callers.
    pub fn advance_status(&mut self, next: ConsolidationStatus) -> bool {
        if self.consolidation_status.can_advance_to(next) {
            self.consolidation_status = next;
            true
        } else {
            false
        }
    }
}
