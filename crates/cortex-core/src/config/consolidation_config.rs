use serde::{Deserialize, Serialize};

/// Configuration for the consolidation pipeline (§4.2 / C8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    pub run_interval_hours: u64,
    pub min_episodes_to_run: usize,
    pub dedup_threshold: f64,
    pub similar_threshold: f64,
    pub cluster_threshold: f64,
    pub min_cluster_size: usize,
    pub schema_min_confidence: f64,
    pub max_episodes_per_run: usize,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            run_interval_hours: 6,
            min_episodes_to_run: 5,
            dedup_threshold: crate::constants::DEFAULT_DEDUP_THRESHOLD,
            similar_threshold: crate::constants::DEFAULT_SIMILAR_THRESHOLD,
            cluster_threshold: crate::constants::DEFAULT_CLUSTER_THRESHOLD,
            min_cluster_size: crate::constants::DEFAULT_MIN_CLUSTER_SIZE,
            schema_min_confidence: 0.6,
            max_episodes_per_run: 500,
        }
    }
}
