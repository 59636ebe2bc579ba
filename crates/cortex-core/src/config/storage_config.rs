use serde::{Deserialize, Serialize};

/// Configuration for the persistence adapter (§1 C1/C3/C4 stores).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub max_connections: u32,
    pub query_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            query_timeout_ms: 5_000,
        }
    }
}
