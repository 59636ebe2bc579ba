//! §4.5 step 3 "Belief extraction".

use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::config::ConsolidationConfig;
use cortex_core::constants::initial_confidence;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, EpisodeId, MemoryId, TenantId};
use cortex_core::models::{Contradiction, Episode, Memory, MutationSourceType, Provenance};
use cortex_core::traits::{ContradictionStore, EmbeddingProvider, GraphStore, LanguageReasoner, MemoryStore};
use cortex_graph::builder::{contradicts_edge, derived_from_edge};
use tracing::warn;

use crate::util::{classify_evidence, cosine};

#[derive(Debug, Clone, Default)]
pub struct BeliefOutcome {
    pub extracted: u64,
    pub reinforced: u64,
    pub merged: u64,
    /// Ids of memories freshly inserted this pass, handed to the
    /// associations step so it only links what's new.
    pub new_memory_ids: Vec<MemoryId>,
}

#[allow(clippy::too_many_arguments)]
pub async fn process_episode_beliefs(
    reasoner: &dyn LanguageReasoner,
    embeddings: &dyn EmbeddingProvider,
    memories: &Arc<dyn MemoryStore>,
    graph: &Arc<dyn GraphStore>,
    confidence: &ConfidenceEngine,
    contradictions: &Arc<dyn ContradictionStore>,
    config: &ConsolidationConfig,
    tenant_id: TenantId,
    agent_id: AgentId,
    episode: &Episode,
) -> CortexResult<BeliefOutcome> {
    let mut outcome = BeliefOutcome::default();

    let candidates = match reasoner.extract(&episode.raw_content).await {
        Ok(c) => c,
        Err(e) => {
            warn!(episode_id = %episode.id, error = %e, "belief candidate extraction failed");
            return Ok(outcome);
        }
    };

    for candidate in candidates {
        let candidate_embedding = match embeddings.embed(&candidate.content).await {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "embedding unavailable; skipping belief candidate");
                continue;
            }
        };

        let same_type = memories.list_by_type(tenant_id, agent_id, candidate.memory_type).await?;
        let best: Option<(&Memory, f64)> = same_type
            .iter()
            .map(|m| {
                let sim = m
                    .embedding
                    .as_ref()
                    .map(|e| cosine(&candidate_embedding, e))
                    .unwrap_or(0.0);
                (m, sim)
            })
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((existing, sim)) = best {
            if sim >= config.dedup_threshold {
                confidence
                    .reinforce(tenant_id, agent_id, existing.id, MutationSourceType::System, Some(episode.id.to_string()))
                    .await?;
                link_memory_to_episode(graph, existing.id.to_string(), episode.id).await?;
                outcome.reinforced += 1;
                continue;
            }

            if sim >= config.similar_threshold {
                let contradictory = reasoner
                    .check_contradiction(&candidate.content, &existing.content)
                    .await
                    .unwrap_or(false);
                if !contradictory {
                    let mut merged = existing.clone();
                    merged
                        .metadata
                        .entry("merged_evidence".to_string())
                        .or_insert_with(|| serde_json::json!([]));
                    if let Some(arr) = merged.metadata.get_mut("merged_evidence").and_then(|v| v.as_array_mut()) {
                        arr.push(serde_json::json!(candidate.evidence));
                    }
                    memories.upsert(merged).await?;
                    confidence
                        .reinforce(tenant_id, agent_id, existing.id, MutationSourceType::System, Some(episode.id.to_string()))
                        .await?;
                    link_memory_to_episode(graph, existing.id.to_string(), episode.id).await?;
                    outcome.merged += 1;
                    continue;
                }
            }

            // No reinforce/merge match: check whether the new belief
            // contradicts the closest existing one before inserting it.
            let contradictory = reasoner
                .check_contradiction(&candidate.content, &existing.content)
                .await
                .unwrap_or(false);
            let new_memory = insert_new_belief(
                memories,
                graph,
                tenant_id,
                agent_id,
                episode,
                &candidate.content,
                candidate.memory_type,
                &candidate.evidence,
                &candidate_embedding,
            )
            .await?;
            outcome.extracted += 1;
            outcome.new_memory_ids.push(new_memory.id);

            if contradictory {
                contradictions
                    .append(Contradiction::new(existing.id, new_memory.id))
                    .await?;
                graph
                    .upsert_edge(contradicts_edge(&existing.id.to_string(), &new_memory.id.to_string()))
                    .await?;
                confidence
                    .apply_feedback_effect(
                        tenant_id,
                        agent_id,
                        existing.id,
                        cortex_core::constants::feedback_effect(
                            cortex_core::models::FeedbackSignalType::Contradicted,
                        ),
                        MutationSourceType::System,
                        Some(new_memory.id.to_string()),
                    )
                    .await?;
            }
            continue;
        }

        let saved = insert_new_belief(
            memories,
            graph,
            tenant_id,
            agent_id,
            episode,
            &candidate.content,
            candidate.memory_type,
            &candidate.evidence,
            &candidate_embedding,
        )
        .await?;
        outcome.extracted += 1;
        outcome.new_memory_ids.push(saved.id);
    }

    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
async fn insert_new_belief(
    memories: &Arc<dyn MemoryStore>,
    graph: &Arc<dyn GraphStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
    episode: &Episode,
    content: &str,
    memory_type: cortex_core::models::MemoryType,
    evidence: &str,
    embedding: &[f32],
) -> CortexResult<Memory> {
    let evidence_type = classify_evidence(evidence, episode.outcome);
    let mut memory = Memory::new(
        tenant_id,
        agent_id,
        memory_type,
        content,
        Provenance::Derived,
        initial_confidence(evidence_type),
        0.02,
    );
    memory.embedding = Some(embedding.to_vec());
    let saved = memories.upsert(memory).await?;
    link_memory_to_episode(graph, saved.id.to_string(), episode.id).await?;
    Ok(saved)
}

async fn link_memory_to_episode(
    graph: &Arc<dyn GraphStore>,
    memory_node_id: String,
    episode_id: EpisodeId,
) -> CortexResult<()> {
    graph
        .upsert_edge(derived_from_edge(&memory_node_id, &episode_id.to_string()))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::ids::{AgentId, TenantId};
    use cortex_core::models::{Episode, Memory, MemoryType, Provenance};
    use cortex_core::traits::EmbeddingProvider;
    use cortex_embeddings::MockEmbeddingProvider;
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    fn harness() -> (Arc<InMemoryStore>, MockEmbeddingProvider, MockLanguageReasoner, ConfidenceEngine) {
        let store = Arc::new(InMemoryStore::default());
        let embeddings = MockEmbeddingProvider::new(32);
        let reasoner = MockLanguageReasoner;
        let confidence = ConfidenceEngine::new(store.clone(), store.clone());
        (store, embeddings, reasoner, confidence)
    }

    #[tokio::test]
    async fn identical_statement_reinforces_existing_belief() {
        let (store, embeddings, reasoner, confidence) = harness();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let content = "User prefers dark mode interfaces";
        let mut existing = Memory::new(
            tenant_id,
            agent_id,
            MemoryType::Preference,
            content,
            Provenance::User,
            0.7,
            0.01,
        );
        existing.embedding = Some(embeddings.embed(content).await.unwrap());
        store.upsert(existing.clone()).await.unwrap();

        let episode = Episode::new(tenant_id, agent_id, format!("{content}."), chrono::Utc::now());
        let config = ConsolidationConfig::default();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let graph: Arc<dyn GraphStore> = store.clone();
        let contradictions: Arc<dyn ContradictionStore> = store.clone();

        let outcome = process_episode_beliefs(
            &reasoner,
            &embeddings,
            &memories,
            &graph,
            &confidence,
            &contradictions,
            &config,
            tenant_id,
            agent_id,
            &episode,
        )
        .await
        .unwrap();

        assert_eq!(outcome.reinforced, 1);
        assert_eq!(outcome.extracted, 0);
    }

    #[tokio::test]
    async fn novel_statement_creates_a_new_belief() {
        let (store, embeddings, reasoner, confidence) = harness();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let episode = Episode::new(
            tenant_id,
            agent_id,
            "Completely unrelated gardening technique discovered today.".to_string(),
            chrono::Utc::now(),
        );
        let config = ConsolidationConfig::default();

        let memories: Arc<dyn MemoryStore> = store.clone();
        let graph: Arc<dyn GraphStore> = store.clone();
        let contradictions: Arc<dyn ContradictionStore> = store.clone();

        let outcome = process_episode_beliefs(
            &reasoner,
            &embeddings,
            &memories,
            &graph,
            &confidence,
            &contradictions,
            &config,
            tenant_id,
            agent_id,
            &episode,
        )
        .await
        .unwrap();

        assert_eq!(outcome.extracted, 1);
        assert_eq!(outcome.new_memory_ids.len(), 1);
    }
}
