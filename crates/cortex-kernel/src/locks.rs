//! Per-agent mutual exclusion and request deadlines (§5 "Concurrency &
//! resource model"). Every kernel operation that mutates agent state
//! acquires the lock for `(tenant_id, agent_id)` for its duration;
//! operations on different agents never block one another.

use std::sync::Arc;
use std::time::Duration;

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::ids::AgentScope;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lazily-created `Mutex` per `(tenant_id, agent_id)`. Locks are never
/// removed — the set is bounded by the number of distinct agents the
/// process has ever touched, which is acceptable for a process-scoped
/// lock set (§5 "Shared resources").
#[derive(Default)]
pub struct AgentLocks {
    locks: DashMap<AgentScope, Arc<Mutex<()>>>,
}

impl AgentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `scope`, blocking other operations on the same
    /// agent until the returned guard is dropped.
    pub async fn acquire(&self, scope: AgentScope) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(scope)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }
}

/// Wraps `fut` in `tokio::time::timeout` when `deadline` is set, mapping an
/// elapsed timeout to `CortexError::DeadlineExceeded` (§5 "Cancellation &
/// timeouts").
pub async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> CortexResult<T>
where
    F: std::future::Future<Output = CortexResult<T>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or(Err(CortexError::DeadlineExceeded)),
        None => fut.await,
    }
}
