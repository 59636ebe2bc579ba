use crate::ids::{AgentId, MemoryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// §3 Feedback signal `signal_type` — drives the confidence adjustment
/// table in [`crate::constants::feedback_effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSignalType {
    Helpful,
    Unhelpful,
    Used,
    Ignored,
    Contradicted,
    Outdated,
}

/// §3 Feedback signal — explicit or implicit evidence about whether a
/// memory helped the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackSignal {
    pub memory_id: MemoryId,
    pub agent_id: AgentId,
    pub signal_type: FeedbackSignalType,
    pub context: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeedbackSignal {
    pub fn new(memory_id: MemoryId, agent_id: AgentId, signal_type: FeedbackSignalType) -> Self {
        Self {
            memory_id,
            agent_id,
            signal_type,
            context: None,
            created_at: Utc::now(),
        }
    }
}
