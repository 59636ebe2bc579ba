use serde::{Deserialize, Serialize};

/// Configuration for the background decay scheduler (§4.1/§4.2/§4.8, C9).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Cadence for the memory decay worker.
    pub memory_decay_interval_hours: u64,
    /// Cadence for the episode-strength and edge-prune workers.
    pub edge_prune_interval_hours: u64,
    pub batch_size: usize,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    /// Per-day rate for episode `memory_strength` decay (§4.8).
    pub episode_decay_rate: f64,
    /// Per-hour λ for edge strength decay (§4.2).
    pub edge_decay_lambda_per_hour: f64,
    /// Drop edges untraversed for this many days with `traversal_count`
    /// below the floor below (§4.2 "Pruning rules").
    pub edge_prune_stale_days: i64,
    pub edge_prune_min_traversal_count: u64,
    /// Keep only the top-N outgoing edges per source node by strength.
    pub edge_prune_max_per_source: usize,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            memory_decay_interval_hours: 1,
            edge_prune_interval_hours: 24,
            batch_size: 200,
            max_retries: 3,
            retry_backoff_ms: 100,
            episode_decay_rate: 0.05,
            edge_decay_lambda_per_hour: 0.01,
            edge_prune_stale_days: 90,
            edge_prune_min_traversal_count: 3,
            edge_prune_max_per_source: 50,
        }
    }
}
