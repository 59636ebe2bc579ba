use crate::models::MemoryTypePolicy;
use serde::{Deserialize, Serialize};

/// Configuration for the per-type retention policy subsystem (§4.7 / C11).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub type_policies: Vec<MemoryTypePolicy>,
    pub eviction_batch_size: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        use crate::models::MemoryType::*;
        Self {
            type_policies: vec![
                MemoryTypePolicy::new(Preference),
                MemoryTypePolicy::new(Fact),
                MemoryTypePolicy::new(Decision),
                MemoryTypePolicy::new(Constraint),
            ],
            eviction_batch_size: 100,
        }
    }
}
