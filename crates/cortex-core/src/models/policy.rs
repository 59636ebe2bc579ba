use super::memory::MemoryType;
use serde::{Deserialize, Serialize};

/// §4.7 / §6 per-type retention and capacity policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTypePolicy {
    pub memory_type: MemoryType,
    pub max_memories: Option<u64>,
    pub retention_days: Option<u32>,
    pub priority_weight: f64,
    pub auto_summarize: bool,
}

impl MemoryTypePolicy {
    pub fn new(memory_type: MemoryType) -> Self {
        Self {
            memory_type,
            max_memories: None,
            retention_days: None,
            priority_weight: 1.0,
            auto_summarize: false,
        }
    }
}
