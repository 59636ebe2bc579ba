//! `CortexKernel` — the facade crate of §2/§5: one instance of every
//! subsystem, wired behind per-agent locks and request deadlines, exposing
//! the operation surface `cortex-server` calls.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use cortex_confidence::ConfidenceEngine;
use cortex_consolidation::ConsolidationEngine;
use cortex_core::config::CortexConfig;
use cortex_core::observability::Metrics;
use cortex_core::traits::{
    AgentStore, ContradictionStore, EmbeddingProvider, EntityStore, EpisodeStore, FeedbackStore,
    GraphStore, LanguageReasoner, MemoryStore, MutationLogStore, ProcedureStore, SchemaStore,
    TenantStore, WorkingMemoryStore,
};
use cortex_decay::DecayEngine;
use cortex_learning::LearningEngine;
use cortex_metacognition::MetacognitionEngine;
use cortex_policy::PolicyEnforcer;
use cortex_retrieval::RecallPipeline;
use cortex_session::WorkingMemoryPipeline;
use parking_lot::Mutex as SyncMutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::health::{HealthSnapshot, MetricsSnapshot};
use crate::locks::AgentLocks;

/// Every external capability and kernel operation surface is reachable
/// only through trait objects or the owned engines below — the kernel
/// never depends on a concrete storage technology.
pub struct CortexKernel {
    pub(crate) tenants: Arc<dyn TenantStore>,
    pub(crate) agents: Arc<dyn AgentStore>,
    pub(crate) memories: Arc<dyn MemoryStore>,
    pub(crate) episodes: Arc<dyn EpisodeStore>,
    pub(crate) procedures: Arc<dyn ProcedureStore>,
    pub(crate) schemas: Arc<dyn SchemaStore>,
    pub(crate) entities: Arc<dyn EntityStore>,
    pub(crate) graph: Arc<dyn GraphStore>,
    pub(crate) sessions: Arc<dyn WorkingMemoryStore>,
    pub(crate) mutation_log: Arc<dyn MutationLogStore>,
    pub(crate) feedback: Arc<dyn FeedbackStore>,
    pub(crate) contradictions: Arc<dyn ContradictionStore>,
    pub(crate) embeddings: Arc<dyn EmbeddingProvider>,
    pub(crate) reasoner: Arc<dyn LanguageReasoner>,

    pub(crate) confidence: ConfidenceEngine,
    pub(crate) recall: Arc<RecallPipeline>,
    pub(crate) activation: Arc<WorkingMemoryPipeline>,
    pub(crate) consolidation: Arc<ConsolidationEngine>,
    pub(crate) decay: Arc<DecayEngine>,
    pub(crate) policy: Arc<PolicyEnforcer>,
    pub(crate) learning: Arc<LearningEngine>,
    pub(crate) metacognition: Arc<MetacognitionEngine>,

    pub(crate) locks: AgentLocks,
    pub(crate) metrics: Arc<Metrics>,
    pub(crate) config: CortexConfig,

    started_at: Instant,
    last_consolidation_tick: Arc<SyncMutex<Option<DateTime<Utc>>>>,
    last_decay_tick: Arc<SyncMutex<Option<DateTime<Utc>>>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    scheduler_handles: SyncMutex<Vec<JoinHandle<()>>>,
}

/// Bound required of the single backing store passed to [`CortexKernel::new`]
/// — one type implementing every per-kind store trait, the same pattern the
/// rest of the workspace's tests share one `InMemoryStore` across many
/// trait-object fields.
pub trait CortexStore:
    TenantStore
    + AgentStore
    + MemoryStore
    + EpisodeStore
    + ProcedureStore
    + SchemaStore
    + EntityStore
    + GraphStore
    + WorkingMemoryStore
    + MutationLogStore
    + FeedbackStore
    + ContradictionStore
{
}

impl<T> CortexStore for T where
    T: TenantStore
        + AgentStore
        + MemoryStore
        + EpisodeStore
        + ProcedureStore
        + SchemaStore
        + EntityStore
        + GraphStore
        + WorkingMemoryStore
        + MutationLogStore
        + FeedbackStore
        + ContradictionStore
{
}

impl CortexKernel {
    pub fn new<S>(
        config: CortexConfig,
        store: Arc<S>,
        embeddings: Arc<dyn EmbeddingProvider>,
        reasoner: Arc<dyn LanguageReasoner>,
    ) -> Arc<Self>
    where
        S: CortexStore + 'static,
    {
        let tenants: Arc<dyn TenantStore> = store.clone();
        let agents: Arc<dyn AgentStore> = store.clone();
        let memories: Arc<dyn MemoryStore> = store.clone();
        let episodes: Arc<dyn EpisodeStore> = store.clone();
        let procedures: Arc<dyn ProcedureStore> = store.clone();
        let schemas: Arc<dyn SchemaStore> = store.clone();
        let entities: Arc<dyn EntityStore> = store.clone();
        let graph: Arc<dyn GraphStore> = store.clone();
        let sessions: Arc<dyn WorkingMemoryStore> = store.clone();
        let mutation_log: Arc<dyn MutationLogStore> = store.clone();
        let feedback: Arc<dyn FeedbackStore> = store.clone();
        let contradictions: Arc<dyn ContradictionStore> = store.clone();

        let confidence = ConfidenceEngine::new(memories.clone(), mutation_log.clone());

        let recall = Arc::new(RecallPipeline::new(
            embeddings.clone(),
            memories.clone(),
            graph.clone(),
            Arc::new(ConfidenceEngine::new(memories.clone(), mutation_log.clone())),
        ));

        let activation = Arc::new(WorkingMemoryPipeline::new(
            memories.clone(),
            episodes.clone(),
            procedures.clone(),
            schemas.clone(),
            sessions.clone(),
            graph.clone(),
            embeddings.clone(),
            recall.clone(),
            config.session.clone(),
        ));

        let policy = Arc::new(PolicyEnforcer::new(
            memories.clone(),
            agents.clone(),
            reasoner.clone(),
            config.policy.type_policies.clone(),
            config.policy.eviction_batch_size,
        ));

        let consolidation = Arc::new(ConsolidationEngine::new(
            reasoner.clone(),
            embeddings.clone(),
            memories.clone(),
            episodes.clone(),
            procedures.clone(),
            schemas.clone(),
            graph.clone(),
            contradictions.clone(),
            ConfidenceEngine::new(memories.clone(), mutation_log.clone()),
            policy.clone(),
            config.consolidation.clone(),
        ));

        let decay = Arc::new(DecayEngine::new(
            memories.clone(),
            episodes.clone(),
            graph.clone(),
            ConfidenceEngine::new(memories.clone(), mutation_log.clone()),
            config.decay.clone(),
        ));

        let learning = Arc::new(LearningEngine::new(
            memories.clone(),
            feedback.clone(),
            ConfidenceEngine::new(memories.clone(), mutation_log.clone()),
            reasoner.clone(),
        ));

        let metacognition = Arc::new(MetacognitionEngine::new(
            memories.clone(),
            mutation_log.clone(),
            contradictions.clone(),
            schemas.clone(),
            procedures.clone(),
        ));

        let (shutdown_tx, _) = tokio::sync::watch::channel(false);

        Arc::new(Self {
            tenants,
            agents,
            memories,
            episodes,
            procedures,
            schemas,
            entities,
            graph,
            sessions,
            mutation_log,
            feedback,
            contradictions,
            embeddings,
            reasoner,
            confidence,
            recall,
            activation,
            consolidation,
            decay,
            policy,
            learning,
            metacognition,
            locks: AgentLocks::new(),
            metrics: Arc::new(Metrics::new()),
            config,
            started_at: Instant::now(),
            last_consolidation_tick: Arc::new(SyncMutex::new(None)),
            last_decay_tick: Arc::new(SyncMutex::new(None)),
            shutdown_tx,
            scheduler_handles: SyncMutex::new(Vec::new()),
        })
    }

    pub fn config(&self) -> &CortexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn health(&self) -> HealthSnapshot {
        HealthSnapshot {
            status: "ok".to_string(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
            last_consolidation_tick: *self.last_consolidation_tick.lock(),
            last_decay_tick: *self.last_decay_tick.lock(),
            metrics: MetricsSnapshot::from(self.metrics.as_ref()),
        }
    }

    /// Starts the background schedulers (§4.8/§9 "one loop per worker
    /// kind"): consolidation at `consolidation.run_interval_hours` and
    /// decay/pruning at `decay.memory_decay_interval_hours`. Idempotent to
    /// call once; calling twice just runs two overlapping sets of loops, so
    /// callers (`cortex-server`'s startup) should call it exactly once.
    pub fn start_schedulers(self: &Arc<Self>) {
        self.scheduler_handles.lock().push(self.spawn_consolidation_loop());
        self.scheduler_handles.lock().push(self.spawn_decay_loop());
    }

    fn spawn_consolidation_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let kernel = self.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let period = std::time::Duration::from_secs(
            (self.config.consolidation.run_interval_hours.max(1)) * 3600,
        );
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        kernel.run_consolidation_tick().await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }

    fn spawn_decay_loop(self: &Arc<Self>) -> JoinHandle<()> {
        let kernel = self.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let period = std::time::Duration::from_secs(
            (self.config.decay.memory_decay_interval_hours.max(1)) * 3600,
        );
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        kernel.run_decay_tick().await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        })
    }

    async fn run_consolidation_tick(&self) {
        let agents = match self.agents.list_all().await {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, "consolidation tick: could not list agents");
                return;
            }
        };
        for agent in agents {
            let scope = cortex_core::ids::AgentScope::new(agent.tenant_id, agent.id);
            let _guard = self.locks.acquire(scope).await;
            match self
                .consolidation
                .run(agent.tenant_id, agent.id, cortex_consolidation::ConsolidationScope::Recent)
                .await
            {
                Ok(result) => {
                    self.metrics.consolidation_runs.incr();
                    info!(agent_id = %agent.id, ?result, "consolidation tick complete");
                }
                Err(e) => warn!(agent_id = %agent.id, error = %e, "consolidation tick failed"),
            }
        }
        *self.last_consolidation_tick.lock() = Some(Utc::now());
    }

    async fn run_decay_tick(&self) {
        let agents = match self.agents.list_all().await {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, "decay tick: could not list agents");
                return;
            }
        };
        for agent in agents {
            let scope = cortex_core::ids::AgentScope::new(agent.tenant_id, agent.id);
            let _guard = self.locks.acquire(scope).await;
            match self.decay.run(agent.tenant_id, agent.id).await {
                Ok(result) => {
                    self.metrics.decay_runs.incr();
                    info!(agent_id = %agent.id, ?result, "decay tick complete");
                }
                Err(e) => warn!(agent_id = %agent.id, error = %e, "decay tick failed"),
            }
        }
        *self.last_decay_tick.lock() = Some(Utc::now());
    }

    /// Signals every background scheduler to stop and joins them. Pending
    /// ticks are allowed to finish (graceful, not cancelled mid-pass).
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.scheduler_handles.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "scheduler task panicked during shutdown");
            }
        }
    }
}
