//! Process metrics exposed at `/metrics` (§6). No metrics crate sits in
//! this workspace's dependency stack, so counters are hand-rolled atomics
//! rather than pulled in as a new third-party dependency for this alone.

use std::sync::atomic::{AtomicU64, Ordering};

/// A single monotonic counter, safe to share across tasks.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn incr(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Process-wide counters surfaced by `GET /metrics`.
#[derive(Debug, Default)]
pub struct Metrics {
    pub memories_created: Counter,
    pub memories_deleted: Counter,
    pub recalls_served: Counter,
    pub reinforcements: Counter,
    pub penalizations: Counter,
    pub contradictions_detected: Counter,
    pub consolidation_runs: Counter,
    pub decay_runs: Counter,
    pub embedding_failures: Counter,
    pub reasoner_failures: Counter,
    pub storage_failures: Counter,
    pub rate_limited_requests: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let lines = [
            ("cortex_memories_created_total", self.memories_created.get()),
            ("cortex_memories_deleted_total", self.memories_deleted.get()),
            ("cortex_recalls_served_total", self.recalls_served.get()),
            ("cortex_reinforcements_total", self.reinforcements.get()),
            ("cortex_penalizations_total", self.penalizations.get()),
            (
                "cortex_contradictions_detected_total",
                self.contradictions_detected.get(),
            ),
            ("cortex_consolidation_runs_total", self.consolidation_runs.get()),
            ("cortex_decay_runs_total", self.decay_runs.get()),
            ("cortex_embedding_failures_total", self.embedding_failures.get()),
            ("cortex_reasoner_failures_total", self.reasoner_failures.get()),
            ("cortex_storage_failures_total", self.storage_failures.get()),
            (
                "cortex_rate_limited_requests_total",
                self.rate_limited_requests.get(),
            ),
        ];
        let mut out = String::new();
        for (name, value) in lines {
            out.push_str(&format!("# TYPE {name} counter\n{name} {value}\n"));
        }
        out
    }
}
