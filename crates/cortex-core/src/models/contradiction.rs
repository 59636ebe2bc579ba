use crate::ids::MemoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// §3 Contradiction — recorded when consolidation or learning finds one
/// memory directly at odds with another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contradiction {
    pub belief_id: MemoryId,
    pub contradicted_by_id: MemoryId,
    pub detected_at: DateTime<Utc>,
}

impl Contradiction {
    pub fn new(belief_id: MemoryId, contradicted_by_id: MemoryId) -> Self {
        Self {
            belief_id,
            contradicted_by_id,
            detected_at: Utc::now(),
        }
    }
}
