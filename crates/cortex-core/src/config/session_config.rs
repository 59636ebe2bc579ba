use serde::{Deserialize, Serialize};

/// Configuration for working memory / session handling (§4.4 / C4, C7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_slots: usize,
    pub session_ttl_minutes: u64,
    pub procedure_match_threshold: f64,
    /// §4.4 step 2 "recent episodes in last N minutes".
    pub recent_episode_window_minutes: i64,
    /// Small `top_k` used for per-cue and goal-driven recall in the pool.
    pub direct_recall_top_k: usize,
    /// Cap on `active_context` length (§3 Working memory).
    pub context_message_cap: usize,
    /// `limit` passed to §4.6 schema matching.
    pub schema_match_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_slots: crate::constants::DEFAULT_MAX_SLOTS,
            session_ttl_minutes: 120,
            procedure_match_threshold: crate::constants::PROCEDURE_MATCH_THRESHOLD,
            recent_episode_window_minutes: 30,
            direct_recall_top_k: 5,
            context_message_cap: 20,
            schema_match_limit: 3,
        }
    }
}
