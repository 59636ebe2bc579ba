//! `ConsolidationEngine` — orchestrates the seven consolidation steps
//! (§4.5, C8) for a single `(tenant, agent)` pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::config::ConsolidationConfig;
use cortex_core::errors::{ConsolidationError, CortexError, CortexResult};
use cortex_core::ids::{AgentId, AgentScope, TenantId};
use cortex_core::traits::{
    ContradictionStore, EmbeddingProvider, EpisodeStore, GraphStore, LanguageReasoner,
    MemoryStore, ProcedureStore, SchemaStore,
};
use dashmap::DashMap;
use tracing::{info, warn};

use crate::associations::build_thematic_associations;
use crate::belief::process_episode_beliefs;
use crate::enrich::enrich_episode;
use crate::episodes::select_episodes;
use crate::procedure::process_episode_procedure;
use crate::result::{ConsolidationResult, ConsolidationScope};
use crate::schema::detect_schemas;

/// Ties the seven consolidation steps together behind a per-agent
/// single-flight guard: one pass per agent at a time, different agents run
/// independently, using the same `DashMap<_, Arc<AtomicBool>>` +
/// `compare_exchange` single-execution pattern used elsewhere in this
/// workspace for per-agent exclusivity.
pub struct ConsolidationEngine {
    reasoner: Arc<dyn LanguageReasoner>,
    embeddings: Arc<dyn EmbeddingProvider>,
    memories: Arc<dyn MemoryStore>,
    episodes: Arc<dyn EpisodeStore>,
    procedures: Arc<dyn ProcedureStore>,
    schemas: Arc<dyn SchemaStore>,
    graph: Arc<dyn GraphStore>,
    contradictions: Arc<dyn ContradictionStore>,
    confidence: ConfidenceEngine,
    policy: Arc<cortex_policy::PolicyEnforcer>,
    config: ConsolidationConfig,
    running: DashMap<AgentScope, Arc<AtomicBool>>,
}

impl ConsolidationEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reasoner: Arc<dyn LanguageReasoner>,
        embeddings: Arc<dyn EmbeddingProvider>,
        memories: Arc<dyn MemoryStore>,
        episodes: Arc<dyn EpisodeStore>,
        procedures: Arc<dyn ProcedureStore>,
        schemas: Arc<dyn SchemaStore>,
        graph: Arc<dyn GraphStore>,
        contradictions: Arc<dyn ContradictionStore>,
        confidence: ConfidenceEngine,
        policy: Arc<cortex_policy::PolicyEnforcer>,
        config: ConsolidationConfig,
    ) -> Self {
        Self {
            reasoner,
            embeddings,
            memories,
            episodes,
            procedures,
            schemas,
            graph,
            contradictions,
            confidence,
            policy,
            config,
            running: DashMap::new(),
        }
    }

    /// Runs one consolidation pass for `(tenant_id, agent_id)`. Returns
    /// `ConsolidationError::AlreadyRunning` if a pass for the same agent is
    /// already in flight — callers should treat that as a no-op, not a
    /// failure worth retrying immediately.
    pub async fn run(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        scope: ConsolidationScope,
    ) -> CortexResult<ConsolidationResult> {
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
            return Err(CortexError::ConsolidationError(ConsolidationError::AlreadyRunning {
                agent_id: agent_id.to_string(),
            }));
        }

        let outcome = self.run_locked(tenant_id, agent_id, scope).await;
        guard.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run_locked(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        scope: ConsolidationScope,
    ) -> CortexResult<ConsolidationResult> {
        let mut result = ConsolidationResult::default();

        let selected = select_episodes(
            &self.episodes,
            tenant_id,
            agent_id,
            scope,
            self.config.max_episodes_per_run,
        )
        .await?;
        result.episodes_processed = selected.len() as u64;

        let mut new_memory_ids = Vec::new();

        for mut episode in selected {
            if !enrich_episode(self.reasoner.as_ref(), &mut episode).await? {
                continue;
            }
            self.episodes.upsert(episode.clone()).await?;

            let beliefs = process_episode_beliefs(
                self.reasoner.as_ref(),
                self.embeddings.as_ref(),
                &self.memories,
                &self.graph,
                &self.confidence,
                &self.contradictions,
                &self.config,
                tenant_id,
                agent_id,
                &episode,
            )
            .await?;
            result.semantic_extracted += beliefs.extracted;
            result.semantic_reinforced += beliefs.reinforced;
            result.memories_merged += beliefs.merged;
            new_memory_ids.extend(beliefs.new_memory_ids);

            let procedure_outcome = process_episode_procedure(
                self.reasoner.as_ref(),
                self.embeddings.as_ref(),
                &self.procedures,
                &self.config,
                tenant_id,
                agent_id,
                &episode,
            )
            .await?;
            result.procedures_learned += procedure_outcome.learned;
            result.procedures_reinforced += procedure_outcome.reinforced;
        }

        let schema_outcome = detect_schemas(
            self.reasoner.as_ref(),
            &self.memories,
            &self.episodes,
            &self.schemas,
            &self.config,
            tenant_id,
            agent_id,
        )
        .await?;
        result.schemas_detected = schema_outcome.detected;
        result.schemas_updated = schema_outcome.updated;

        result.associations_created = build_thematic_associations(
            &self.memories,
            &self.graph,
            &self.config,
            tenant_id,
            agent_id,
            &new_memory_ids,
        )
        .await?;

        match self.policy.enforce(tenant_id, agent_id).await {
            Ok(enforcement) => {
                result.memories_archived = enforcement.overflow_summarized;
                result.memories_decayed = enforcement.retention_deleted + enforcement.expired_deleted;
            }
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "eviction enforcement failed for this pass");
            }
        }

        info!(
            agent_id = %agent_id,
            episodes = result.episodes_processed,
            semantic_extracted = result.semantic_extracted,
            schemas_detected = result.schemas_detected,
            "consolidation pass complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::Agent;
    use cortex_embeddings::MockEmbeddingProvider;
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    fn engine(store: Arc<InMemoryStore>) -> ConsolidationEngine {
        let reasoner: Arc<dyn LanguageReasoner> = Arc::new(MockLanguageReasoner);
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(32));
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());
        let policy = Arc::new(cortex_policy::PolicyEnforcer::new(
            store.clone(),
            store.clone(),
            reasoner.clone(),
            cortex_core::config::PolicyConfig::default().type_policies,
            100,
        ));
        ConsolidationEngine::new(
            reasoner,
            embeddings,
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            confidence,
            policy,
            ConsolidationConfig::default(),
        )
    }

    #[tokio::test]
    async fn single_pass_processes_a_raw_episode_into_a_belief() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent = store.create(Agent::new(tenant_id, "ext-1", "test agent")).await.unwrap();
        let agent_id = agent.id;

        let episode = cortex_core::models::Episode::new(
            tenant_id,
            agent_id,
            "User prefers a quiet workspace in the mornings.",
            chrono::Utc::now(),
        );
        store.upsert(episode).await.unwrap();

        let engine = engine(store);
        let result = engine.run(tenant_id, agent_id, ConsolidationScope::Full).await.unwrap();

        assert_eq!(result.episodes_processed, 1);
        assert!(result.semantic_extracted >= 1);
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
        engine
            .running
            .insert(key, Arc::new(AtomicBool::new(true)));

        let result = engine.run(tenant_id, agent_id, ConsolidationScope::Full).await;
        assert!(matches!(
            result,
            Err(CortexError::ConsolidationError(ConsolidationError::AlreadyRunning { .. }))
        ));
    }
}
