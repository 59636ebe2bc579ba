//! §4.4 step 2 "candidate pool" gathering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use cortex_core::config::SessionConfig;
use cortex_core::constants::PROCEDURE_MATCH_THRESHOLD;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{ActivationSource, MemoryKind};
use cortex_core::traits::{EmbeddingProvider, EpisodeStore, GraphStore, ProcedureStore};
use cortex_graph::activation::{spreading_activation, ACTIVATION_FLOOR};
use cortex_retrieval::{RecallPipeline, RecallRequest};

use crate::schema_match::cosine;

/// One candidate in the §4.4 pool before slot competition.
#[derive(Debug, Clone)]
pub struct PoolCandidate {
    pub memory_kind: MemoryKind,
    pub occupant_id: String,
    pub vector_sim: f64,
    pub graph_act: f64,
    pub recency: f64,
    pub confidence: f64,
    pub activation_source: ActivationSource,
    pub activation_cue: String,
}

impl PoolCandidate {
    /// §4.4 step 3: `score = α·vector_sim + β·graph_act + γ·recency + δ·confidence`.
    pub fn score(&self) -> f64 {
        use cortex_core::constants::{
            WM_SCORE_CONFIDENCE_WEIGHT, WM_SCORE_GRAPH_WEIGHT, WM_SCORE_RECENCY_WEIGHT,
            WM_SCORE_VECTOR_WEIGHT,
        };
        WM_SCORE_VECTOR_WEIGHT * self.vector_sim
            + WM_SCORE_GRAPH_WEIGHT * self.graph_act
            + WM_SCORE_RECENCY_WEIGHT * self.recency
            + WM_SCORE_CONFIDENCE_WEIGHT * self.confidence
    }
}

/// Exponential recency falloff with a 24h half-life; `1.0` at `now`.
pub fn recency_score(last_accessed_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let elapsed_hours = (now - last_accessed_at).num_seconds().max(0) as f64 / 3600.0;
    (-std::f64::consts::LN_2 * elapsed_hours / 24.0).exp().clamp(0.0, 1.0)
}

fn upsert_best(
    pool: &mut Vec<PoolCandidate>,
    kind: MemoryKind,
    id: String,
    vector_sim: f64,
    confidence: f64,
    recency: f64,
    source: ActivationSource,
    cue: &str,
) {
    if let Some(existing) = pool
        .iter_mut()
        .find(|c| c.memory_kind == kind && c.occupant_id == id)
    {
        if vector_sim > existing.vector_sim {
            existing.vector_sim = vector_sim;
            existing.activation_source = source;
            existing.activation_cue = cue.to_string();
        }
        return;
    }
    pool.push(PoolCandidate {
        memory_kind: kind,
        occupant_id: id,
        vector_sim,
        graph_act: 0.0,
        recency,
        confidence,
        activation_source: source,
        activation_cue: cue.to_string(),
    });
}

/// Run hybrid recall for one cue/goal string and fold the hits into `pool`,
/// tagged with `source`.
async fn recall_into_pool(
    recall: &RecallPipeline,
    tenant_id: TenantId,
    agent_id: AgentId,
    query: &str,
    top_k: usize,
    source: ActivationSource,
    pool: &mut Vec<PoolCandidate>,
) -> CortexResult<()> {
    let hits = recall
        .recall(RecallRequest {
            tenant_id,
            agent_id,
            query: query.to_string(),
            top_k,
            vector_weight: 1.0,
            graph_weight: 0.0,
            max_hops: 0,
            use_graph: false,
            memory_type: None,
            min_confidence: 0.0,
            fallback_seed_ids: Vec::new(),
        })
        .await?;
    for hit in hits {
        upsert_best(
            pool,
            MemoryKind::Semantic,
            hit.memory.id.to_string(),
            hit.vector_score,
            hit.memory.confidence,
            recency_score(hit.memory.last_accessed_at, Utc::now()),
            source,
            query,
        );
    }
    Ok(())
}

/// §4.4 step 2, bullets 1-3: per-cue recall, goal-driven recall, recent
/// episodes.
#[allow(clippy::too_many_arguments)]
pub async fn gather_direct_candidates(
    recall: &RecallPipeline,
    episodes: &Arc<dyn EpisodeStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
    cues: &[String],
    goal: Option<&str>,
    config: &SessionConfig,
) -> CortexResult<Vec<PoolCandidate>> {
    let mut pool = Vec::new();

    for cue in cues {
        recall_into_pool(
            recall,
            tenant_id,
            agent_id,
            cue,
            config.direct_recall_top_k,
            ActivationSource::Direct,
            &mut pool,
        )
        .await?;
    }

    if let Some(goal) = goal {
        recall_into_pool(
            recall,
            tenant_id,
            agent_id,
            goal,
            config.direct_recall_top_k,
            ActivationSource::Goal,
            &mut pool,
        )
        .await?;
    }

    let now = Utc::now();
    let window = chrono::Duration::minutes(config.recent_episode_window_minutes);
    let all_episodes = episodes.list(tenant_id, agent_id).await?;
    for episode in all_episodes {
        if now - episode.occurred_at <= window {
            upsert_best(
                &mut pool,
                MemoryKind::Episode,
                episode.id.to_string(),
                0.0,
                episode.importance_score,
                recency_score(episode.last_accessed_at, now),
                ActivationSource::Temporal,
                "recent",
            );
        }
    }

    Ok(pool)
}

/// §4.4 step 2 bullet 5: procedures whose trigger embedding matches one of
/// the cues at cosine similarity >= [`PROCEDURE_MATCH_THRESHOLD`].
pub async fn gather_procedure_candidates(
    procedures: &Arc<dyn ProcedureStore>,
    embeddings: &Arc<dyn EmbeddingProvider>,
    tenant_id: TenantId,
    agent_id: AgentId,
    cues: &[String],
) -> CortexResult<Vec<PoolCandidate>> {
    let mut pool = Vec::new();
    if cues.is_empty() {
        return Ok(pool);
    }
    let all = procedures.list(tenant_id, agent_id).await?;
    for cue in cues {
        let cue_embedding = match embeddings.embed(cue).await {
            Ok(e) => e,
            Err(_) => continue,
        };
        for procedure in &all {
            let Some(trigger_embedding) = &procedure.trigger_embedding else {
                continue;
            };
            let sim = cosine(&cue_embedding, trigger_embedding);
            if sim >= PROCEDURE_MATCH_THRESHOLD {
                upsert_best(
                    &mut pool,
                    MemoryKind::Procedure,
                    procedure.id.to_string(),
                    sim,
                    procedure.confidence,
                    recency_score(
                        procedure.last_used_at.unwrap_or(procedure.created_at),
                        Utc::now(),
                    ),
                    ActivationSource::Direct,
                    cue,
                );
            }
        }
    }
    Ok(pool)
}

/// §4.4 step 2 bullet 4: previously active slot occupants carried forward
/// from the session state that is about to be replaced.
pub fn gather_recency_candidates(
    previous_occupants: &[cortex_core::models::SlotOccupant],
) -> Vec<PoolCandidate> {
    previous_occupants
        .iter()
        .map(|occ| PoolCandidate {
            memory_kind: occ.memory_kind,
            occupant_id: occ.occupant_id.clone(),
            vector_sim: 0.0,
            graph_act: 0.0,
            recency: occ.activation_level,
            confidence: occ.activation_level,
            activation_source: ActivationSource::Recency,
            activation_cue: occ.activation_cue.clone(),
        })
        .collect()
}

/// §4.4 step 2 bullet 6: one-hop graph neighbors of everything gathered so
/// far, marked `spread`. Neighbors already in the pool keep their original
/// source tag; new ones are appended.
pub async fn expand_graph_neighbors(
    graph: &Arc<dyn GraphStore>,
    pool: &mut Vec<PoolCandidate>,
    fanout_limit: usize,
) -> CortexResult<()> {
    if pool.is_empty() {
        return Ok(());
    }
    let seeds: Vec<(String, f64)> = pool
        .iter()
        .map(|c| (c.occupant_id.clone(), c.score().max(ACTIVATION_FLOOR)))
        .collect();
    let result = spreading_activation(graph.as_ref(), &seeds, 1, fanout_limit, None).await?;

    for (node_id, activation) in result.activation {
        // depth 0 entries are the seeds themselves; their own score already
        // accounts for vector/recency/confidence, so only hop >= 1 results
        // feed the `graph_act` component (otherwise a seed's score would
        // feed back into itself).
        if result.depth.get(&node_id).copied().unwrap_or(0) == 0 {
            continue;
        }
        if let Some(existing) = pool.iter_mut().find(|c| c.occupant_id == node_id) {
            existing.graph_act = existing.graph_act.max(activation);
            continue;
        }
        pool.push(PoolCandidate {
            memory_kind: MemoryKind::Semantic,
            occupant_id: node_id,
            vector_sim: 0.0,
            graph_act: activation,
            recency: 0.0,
            confidence: activation,
            activation_source: ActivationSource::Spread,
            activation_cue: String::new(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_score_is_one_at_zero_elapsed() {
        let now = Utc::now();
        assert!((recency_score(now, now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn recency_score_halves_after_one_half_life() {
        let now = Utc::now();
        let then = now - chrono::Duration::hours(24);
        let score = recency_score(then, now);
        assert!((score - 0.5).abs() < 1e-6);
    }
}
