//! Observability snapshot (§10 "Observability") backing `GET /health` and
//! `GET /v1/cognitive/health`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub uptime_seconds: u64,
    pub last_consolidation_tick: Option<DateTime<Utc>>,
    pub last_decay_tick: Option<DateTime<Utc>>,
    pub metrics: MetricsSnapshot,
}

/// Plain-struct mirror of `cortex_core::observability::Metrics` — the
/// atomics themselves aren't `Serialize`, so `/health` reports the
/// point-in-time counts instead of the live registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub memories_created: u64,
    pub memories_deleted: u64,
    pub recalls_served: u64,
    pub reinforcements: u64,
    pub penalizations: u64,
    pub contradictions_detected: u64,
    pub consolidation_runs: u64,
    pub decay_runs: u64,
    pub embedding_failures: u64,
    pub reasoner_failures: u64,
    pub storage_failures: u64,
    pub rate_limited_requests: u64,
}

impl From<&cortex_core::observability::Metrics> for MetricsSnapshot {
    fn from(m: &cortex_core::observability::Metrics) -> Self {
        Self {
            memories_created: m.memories_created.get(),
            memories_deleted: m.memories_deleted.get(),
            recalls_served: m.recalls_served.get(),
            reinforcements: m.reinforcements.get(),
            penalizations: m.penalizations.get(),
            contradictions_detected: m.contradictions_detected.get(),
            consolidation_runs: m.consolidation_runs.get(),
            decay_runs: m.decay_runs.get(),
            embedding_failures: m.embedding_failures.get(),
            reasoner_failures: m.reasoner_failures.get(),
            storage_failures: m.storage_failures.get(),
            rate_limited_requests: m.rate_limited_requests.get(),
        }
    }
}
