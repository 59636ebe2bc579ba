use crate::ids::{AgentId, EpisodeId, ProcedureId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded trigger/action exchange backing a procedure's examples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleExchange {
    pub trigger_text: String,
    pub action_text: String,
    pub occurred_at: DateTime<Utc>,
}

/// §3 Procedure (learned skill).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Procedure {
    pub id: ProcedureId,
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub trigger_pattern: String,
    pub trigger_keywords: Vec<String>,
    pub trigger_embedding: Option<Vec<f32>>,
    pub action_template: String,
    pub action_type: String,
    pub use_count: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub confidence: f64,
    pub memory_strength: f64,
    pub version: u32,
    pub previous_version_id: Option<ProcedureId>,
    pub derived_from_episodes: Vec<EpisodeId>,
    pub examples: Vec<ExampleExchange>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Procedure {
    pub fn new(
        tenant_id: TenantId,
        agent_id: AgentId,
        trigger_pattern: impl Into<String>,
        action_template: impl Into<String>,
        action_type: impl Into<String>,
    ) -> Self {
        Self {
            id: ProcedureId::new(),
            tenant_id,
            agent_id,
            trigger_pattern: trigger_pattern.into(),
            trigger_keywords: Vec::new(),
            trigger_embedding: None,
            action_template: action_template.into(),
            action_type: action_type.into(),
            use_count: 0,
            success_count: 0,
            failure_count: 0,
            confidence: 0.5,
            memory_strength: 1.0,
            version: 1,
            previous_version_id: None,
            derived_from_episodes: Vec::new(),
            examples: Vec::new(),
            created_at: Utc::now(),
            last_used_at: None,
        }
    }

    /// `success / (success + failure)`, 0 when `use_count` is 0 (§3 Procedure).
    pub fn success_rate(&self) -> f64 {
        let total = self.success_count + self.failure_count;
        if total == 0 {
            0.0
        } else {
            self.success_count as f64 / total as f64
        }
    }

    pub fn record_use(&mut self, outcome: super::episode::Outcome) {
        self.use_count += 1;
        self.last_used_at = Some(Utc::now());
        match outcome {
            super::episode::Outcome::Success => self.success_count += 1,
            super::episode::Outcome::Failure => self.failure_count += 1,
            _ => {}
        }
    }
}
