//! §4.4 Working-memory activation pipeline (C7).

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use cortex_core::config::SessionConfig;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, EpisodeId, MemoryId, ProcedureId, TenantId};
use cortex_core::models::{ActiveSchema, MemoryKind, SlotOccupant, WorkingMemorySession};
use cortex_core::traits::{
    EmbeddingProvider, EpisodeStore, GraphStore, MemoryStore, ProcedureStore, SchemaStore,
    WorkingMemoryStore,
};
use cortex_retrieval::RecallPipeline;
use tracing::warn;

use crate::pool::{
    expand_graph_neighbors, gather_direct_candidates, gather_procedure_candidates,
    gather_recency_candidates, PoolCandidate,
};
use crate::schema_match::match_schemas;
use crate::slots::{assemble_context, select_occupants};

/// §4.4 input: `agent_id, tenant_id, goal?, cues[], context?`.
pub struct ActivationRequest {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub goal: Option<String>,
    pub cues: Vec<String>,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ActivationOutcome {
    pub session: WorkingMemorySession,
    /// `false` when the caller's deadline elapsed mid-scoring (§4.4
    /// "Cancellation") — the prior session was left untouched.
    pub persisted: bool,
    pub assembled_context: String,
}

/// Minimum pool score for an episode to count toward the "at least one
/// episode present" slot-competition guarantee (§4.4 step 4).
const MIN_EPISODE_SLOT_SCORE: f64 = 0.2;

pub struct WorkingMemoryPipeline {
    memories: Arc<dyn MemoryStore>,
    episodes: Arc<dyn EpisodeStore>,
    procedures: Arc<dyn ProcedureStore>,
    schemas: Arc<dyn SchemaStore>,
    sessions: Arc<dyn WorkingMemoryStore>,
    graph: Arc<dyn GraphStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    recall: Arc<RecallPipeline>,
    config: SessionConfig,
}

impl WorkingMemoryPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        memories: Arc<dyn MemoryStore>,
        episodes: Arc<dyn EpisodeStore>,
        procedures: Arc<dyn ProcedureStore>,
        schemas: Arc<dyn SchemaStore>,
        sessions: Arc<dyn WorkingMemoryStore>,
        graph: Arc<dyn GraphStore>,
        embeddings: Arc<dyn EmbeddingProvider>,
        recall: Arc<RecallPipeline>,
        config: SessionConfig,
    ) -> Self {
        Self {
            memories,
            episodes,
            procedures,
            schemas,
            sessions,
            graph,
            embeddings,
            recall,
            config,
        }
    }

    /// §4.4 working-memory activation. `deadline`, if set, is checked after
    /// each gathering phase; once it elapses the pool collected so far is
    /// returned without touching the persisted session.
    pub async fn activate(
        &self,
        req: ActivationRequest,
        deadline: Option<Instant>,
    ) -> CortexResult<ActivationOutcome> {
        let mut session = self
            .sessions
            .get_or_create(req.tenant_id, req.agent_id, self.config.max_slots)
            .await?;

        if req.goal.is_some() {
            session.current_goal = req.goal.clone();
        }
        session.active_context.extend(req.context.iter().cloned());
        let cap = self.config.context_message_cap;
        if session.active_context.len() > cap {
            let overflow = session.active_context.len() - cap;
            session.active_context.drain(0..overflow);
        }

        let previous_occupants = session.occupants.clone();

        let mut pool = gather_direct_candidates(
            &self.recall,
            &self.episodes,
            req.tenant_id,
            req.agent_id,
            &req.cues,
            req.goal.as_deref(),
            &self.config,
        )
        .await?;
        pool.extend(gather_recency_candidates(&previous_occupants));

        if deadline_elapsed(deadline) {
            return Ok(self.abort_without_persisting(session, pool));
        }

        pool.extend(
            gather_procedure_candidates(
                &self.procedures,
                &self.embeddings,
                req.tenant_id,
                req.agent_id,
                &req.cues,
            )
            .await?,
        );

        if deadline_elapsed(deadline) {
            return Ok(self.abort_without_persisting(session, pool));
        }

        expand_graph_neighbors(
            &self.graph,
            &mut pool,
            cortex_graph::activation::DEFAULT_FANOUT_LIMIT,
        )
        .await?;

        if deadline_elapsed(deadline) {
            return Ok(self.abort_without_persisting(session, pool));
        }

        let schema_query = req.cues.join(" ");
        let query_embedding = match self.embeddings.embed(&schema_query).await {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "embedding unavailable for schema matching; scoring on context/time only");
                None
            }
        };
        let all_schemas = self.schemas.list(req.tenant_id, req.agent_id).await?;
        let time_of_day = Utc::now().format("%H:%M").to_string();
        let matched_schemas = match_schemas(
            &all_schemas,
            query_embedding.as_deref(),
            &req.context,
            Some(&time_of_day),
            self.config.schema_match_limit,
        );
        let active_schemas: Vec<(ActiveSchema, String)> = matched_schemas
            .into_iter()
            .map(|(schema, score)| {
                (
                    ActiveSchema { schema_id: schema.id, match_score: score },
                    schema.name,
                )
            })
            .collect();

        if deadline_elapsed(deadline) {
            return Ok(self.abort_without_persisting(session, pool));
        }

        let occupants = select_occupants(pool, self.config.max_slots, MIN_EPISODE_SLOT_SCORE);
        session.set_occupants(occupants.clone());
        session.active_schemas = active_schemas.iter().map(|(a, _)| a.clone()).collect();

        let occupant_summaries =
            self.summarize_occupants(req.tenant_id, req.agent_id, &occupants).await;
        let assembled_context = assemble_context(
            session.current_goal.as_deref(),
            &active_schemas,
            &occupant_summaries,
        );

        let saved = self.sessions.save(session).await?;
        Ok(ActivationOutcome { session: saved, persisted: true, assembled_context })
    }

    fn abort_without_persisting(
        &self,
        session: WorkingMemorySession,
        pool: Vec<PoolCandidate>,
    ) -> ActivationOutcome {
        warn!(
            pool_size = pool.len(),
            "working-memory activation deadline elapsed; returning partial pool without persisting"
        );
        let assembled_context =
            pool.iter().map(|c| c.occupant_id.clone()).collect::<Vec<_>>().join("\n");
        ActivationOutcome { session, persisted: false, assembled_context }
    }

    async fn summarize_occupants(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        occupants: &[SlotOccupant],
    ) -> Vec<(SlotOccupant, String)> {
        let mut out = Vec::with_capacity(occupants.len());
        for occ in occupants {
            let summary = self.summarize_one(tenant_id, agent_id, occ).await;
            out.push((occ.clone(), summary));
        }
        out
    }

    async fn summarize_one(&self, tenant_id: TenantId, agent_id: AgentId, occ: &SlotOccupant) -> String {
        match occ.memory_kind {
            MemoryKind::Semantic => {
                if let Ok(id) = MemoryId::parse(&occ.occupant_id) {
                    if let Ok(memory) = self.memories.get(tenant_id, agent_id, id).await {
                        return memory.content;
                    }
                }
            }
            MemoryKind::Episode => {
                if let Ok(id) = EpisodeId::parse(&occ.occupant_id) {
                    if let Ok(episode) = self.episodes.get(tenant_id, agent_id, id).await {
                        return episode.raw_content;
                    }
                }
            }
            MemoryKind::Procedure => {
                if let Ok(id) = ProcedureId::parse(&occ.occupant_id) {
                    if let Ok(procedure) = self.procedures.get(tenant_id, agent_id, id).await {
                        return procedure.trigger_pattern;
                    }
                }
            }
        }
        occ.occupant_id.clone()
    }
}

fn deadline_elapsed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_confidence::ConfidenceEngine;
    use cortex_core::ids::{AgentId, TenantId};
    use cortex_core::models::{Memory, MemoryType, Provenance};
    use cortex_embeddings::MockEmbeddingProvider;
    use cortex_storage::InMemoryStore;

    fn pipeline(store: InMemoryStore) -> WorkingMemoryPipeline {
        let store = Arc::new(store);
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(16));
        let confidence = Arc::new(ConfidenceEngine::new(store.clone(), store.clone()));
        let recall = Arc::new(RecallPipeline::new(
            embeddings.clone(),
            store.clone(),
            store.clone(),
            confidence,
        ));
        WorkingMemoryPipeline::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            embeddings,
            recall,
            SessionConfig::default(),
        )
    }

    #[tokio::test]
    async fn activation_fills_slots_and_persists_session() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut memory = Memory::new(
            tenant_id,
            agent_id,
            MemoryType::Preference,
            "prefers dark mode",
            Provenance::User,
            0.8,
            0.01,
        );
        memory.embedding = Some(vec![1.0; 16]);
        store.upsert(memory).await.unwrap();

        let pipeline = pipeline(store);
        let outcome = pipeline
            .activate(
                ActivationRequest {
                    tenant_id,
                    agent_id,
                    goal: Some("pick a theme".to_string()),
                    cues: vec!["dark mode".to_string()],
                    context: vec![],
                },
                None,
            )
            .await
            .unwrap();

        assert!(outcome.persisted);
        assert!(!outcome.session.occupants.is_empty());
        assert!(outcome.assembled_context.contains("pick a theme"));
    }

    #[tokio::test]
    async fn elapsed_deadline_skips_persistence() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let pipeline = pipeline(store);

        let already_elapsed = Instant::now() - std::time::Duration::from_secs(1);
        let outcome = pipeline
            .activate(
                ActivationRequest {
                    tenant_id,
                    agent_id,
                    goal: None,
                    cues: vec!["anything".to_string()],
                    context: vec![],
                },
                Some(already_elapsed),
            )
            .await
            .unwrap();

        assert!(!outcome.persisted);
    }
}
