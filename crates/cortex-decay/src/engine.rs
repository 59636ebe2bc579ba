//! `DecayEngine` — orchestrates the three decay workers (§4.8, C9) for a
//! single `(tenant, agent)` pass, behind the same per-agent single-flight
//! guard and retry/backoff shape as `cortex-consolidation`'s engine (§7).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cortex_confidence::ConfidenceEngine;
use cortex_core::config::DecayConfig;
use cortex_core::errors::{CortexError, CortexResult, DecayError};
use cortex_core::ids::{AgentId, AgentScope, TenantId};
use cortex_core::retry::with_backoff;
use cortex_core::traits::{EpisodeStore, GraphStore, MemoryStore};
use dashmap::DashMap;
use tracing::info;

use crate::edge::decay_and_prune_edges;
use crate::episode::decay_episodes;
use crate::memory::decay_memories;
use crate::result::DecayResult;

pub struct DecayEngine {
    memories: Arc<dyn MemoryStore>,
    episodes: Arc<dyn EpisodeStore>,
    graph: Arc<dyn GraphStore>,
    confidence: ConfidenceEngine,
    config: DecayConfig,
    running: DashMap<AgentScope, Arc<AtomicBool>>,
}

impl DecayEngine {
    pub fn new(
        memories: Arc<dyn MemoryStore>,
        episodes: Arc<dyn EpisodeStore>,
        graph: Arc<dyn GraphStore>,
        confidence: ConfidenceEngine,
        config: DecayConfig,
    ) -> Self {
        Self {
            memories,
            episodes,
            graph,
            confidence,
            config,
            running: DashMap::new(),
        }
    }

    /// Runs one decay pass (memory decay, episode decay, edge decay/prune)
    /// for `(tenant_id, agent_id)`. Each worker retries up to
    /// `config.max_retries` times with exponential backoff before the pass
    /// fails.
    pub async fn run(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<DecayResult> {
        let key = AgentScope::new(tenant_id, agent_id);
        let guard = self
            .running
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone();

        if guard
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(CortexError::DecayError(DecayError::AlreadyRunning {
                agent_id: agent_id.to_string(),
            }));
        }

        let outcome = self.run_locked(tenant_id, agent_id).await;
        guard.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_locked(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<DecayResult> {
        let mut result = DecayResult::default();
        let base_backoff = Duration::from_millis(self.config.retry_backoff_ms);

        let memory_outcome = with_backoff(self.config.max_retries, base_backoff, "memory_decay", || {
            decay_memories(&self.memories, &self.confidence, tenant_id, agent_id)
        })
        .await?;
        result.memories_decayed = memory_outcome.decayed;
        result.memories_archived_terminal = memory_outcome.archived_terminal;

        let episode_outcome = with_backoff(self.config.max_retries, base_backoff, "episode_decay", || {
            decay_episodes(&self.episodes, self.config.episode_decay_rate, tenant_id, agent_id)
        })
        .await?;
        result.episodes_decayed = episode_outcome.decayed;
        result.episodes_archived = episode_outcome.archived;

        let edge_outcome = with_backoff(self.config.max_retries, base_backoff, "edge_decay_prune", || {
            decay_and_prune_edges(
                &self.graph,
                self.config.edge_decay_lambda_per_hour,
                cortex_core::constants::EDGE_STRENGTH_FLOOR,
                self.config.edge_prune_stale_days,
                self.config.edge_prune_min_traversal_count,
                self.config.edge_prune_max_per_source,
                tenant_id,
                agent_id,
            )
        })
        .await?;
        result.edges_decayed = edge_outcome.decayed;
        result.edges_pruned = edge_outcome.pruned;

        info!(
            agent_id = %agent_id,
            memories_decayed = result.memories_decayed,
            episodes_archived = result.episodes_archived,
            edges_pruned = result.edges_pruned,
            "decay pass complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{Agent, Memory, MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    fn engine(store: Arc<InMemoryStore>) -> DecayEngine {
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());
        DecayEngine::new(store.clone(), store.clone(), store.clone(), confidence, DecayConfig::default())
    }

    #[tokio::test]
    async fn single_pass_decays_a_memory() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent = store.create(Agent::new(tenant_id, "ext-1", "test agent")).await.unwrap();
        let agent_id = agent.id;

        store
            .upsert(Memory::new(tenant_id, agent_id, MemoryType::Fact, "a fact", Provenance::Derived, 0.9, 0.02))
            .await
            .unwrap();

        let engine = engine(store);
        let result = engine.run(tenant_id, agent_id).await.unwrap();

        assert_eq!(result.memories_decayed, 1);
    }

    #[tokio::test]
    async fn concurrent_runs_for_the_same_agent_reject_the_second() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let mut agent = Agent::new(tenant_id, "ext-2", "test agent");
        agent.id = agent_id;
        store.create(agent).await.unwrap();

        let engine = Arc::new(engine(store));
        let key = AgentScope::new(tenant_id, agent_id);
        engine.running.insert(key, Arc::new(AtomicBool::new(true)));

        let result = engine.run(tenant_id, agent_id).await;
        assert!(matches!(result, Err(CortexError::DecayError(DecayError::AlreadyRunning { .. }))));
    }
}
