//! §4.5 step 5 "Schema detection".
//!
//! Clustering is plain cosine-threshold grouping, not density-based
//! clustering, so candidate memories are grouped with a union-find
//! rather than reaching for a clustering crate.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use cortex_core::config::ConsolidationConfig;
use cortex_core::constants::SCHEMA_CANDIDATE_MIN_AGE_HOURS;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{ConsolidationStatus, Episode, Memory, Schema, SchemaType};
use cortex_core::traits::{EpisodeStore, LanguageReasoner, MemoryStore, SchemaStore};
use tracing::info;

use crate::util::cosine;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SchemaOutcome {
    pub detected: u64,
    pub updated: u64,
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Groups `candidates` into clusters where every pair of members has
/// pairwise cosine similarity at or above `threshold`. A greedy
/// any-neighbor union, not full-clique: members need only chain-connect
/// through the group, not all pairwise-match each other.
fn cluster(candidates: &[&Memory], threshold: f64) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(candidates.len());
    for i in 0..candidates.len() {
        let Some(emb_i) = candidates[i].embedding.as_ref() else { continue };
        for j in (i + 1)..candidates.len() {
            let Some(emb_j) = candidates[j].embedding.as_ref() else { continue };
            if cosine(emb_i, emb_j) >= threshold {
                uf.union(i, j);
            }
        }
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..candidates.len() {
        let root = uf.find(i);
        groups.entry(root).or_default().push(i);
    }
    groups.into_values().collect()
}

#[allow(clippy::too_many_arguments)]
pub async fn detect_schemas(
    reasoner: &dyn LanguageReasoner,
    memories: &Arc<dyn MemoryStore>,
    episodes: &Arc<dyn EpisodeStore>,
    schemas: &Arc<dyn SchemaStore>,
    config: &ConsolidationConfig,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<SchemaOutcome> {
    let mut outcome = SchemaOutcome::default();

    let cutoff = Utc::now() - Duration::hours(SCHEMA_CANDIDATE_MIN_AGE_HOURS);
    let all = memories.list(tenant_id, agent_id).await?;
    let candidates: Vec<&Memory> = all
        .iter()
        .filter(|m| m.confidence >= config.schema_min_confidence && m.created_at <= cutoff)
        .collect();

    for group in cluster(&candidates, config.cluster_threshold) {
        if group.len() < config.min_cluster_size {
            continue;
        }
        let members: Vec<&Memory> = group.iter().map(|&i| candidates[i]).collect();
        let contents: Vec<String> = members.iter().map(|m| m.content.clone()).collect();

        let pattern = match reasoner.detect_schema_pattern(&contents).await {
            Ok(p) => p,
            Err(e) => {
                info!(error = %e, cluster_size = members.len(), "schema pattern detection failed for cluster");
                continue;
            }
        };

        let existing = schemas
            .find_by_type_and_name(tenant_id, agent_id, SchemaType::SituationTemplate, &pattern.name)
            .await?;

        match existing {
            Some(mut schema) => {
                for m in &members {
                    schema.add_memory_evidence(m.id);
                }
                schema.confidence = (schema.confidence + 0.05).min(0.95);
                schema.applicable_contexts = pattern.applicable_contexts;
                schemas.upsert(schema).await?;
                outcome.updated += 1;
            }
            None => {
                let n_evidence = members.len();
                let confidence = (0.5 + 0.05 * n_evidence as f64).min(0.8);
                let mut schema = Schema::new(
                    tenant_id,
                    agent_id,
                    SchemaType::SituationTemplate,
                    pattern.name,
                    pattern.description,
                    confidence,
                );
                schema.applicable_contexts = pattern.applicable_contexts;
                for m in &members {
                    schema.add_memory_evidence(m.id);
                }
                schemas.upsert(schema).await?;
                outcome.detected += 1;
            }
        }

        advance_contributing_episodes(episodes, tenant_id, agent_id, &members).await?;
    }

    Ok(outcome)
}

async fn advance_contributing_episodes(
    episodes: &Arc<dyn EpisodeStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
    members: &[&Memory],
) -> CortexResult<()> {
    let processed = episodes
        .list_by_status(tenant_id, agent_id, ConsolidationStatus::Processed)
        .await?;

    let member_ids: std::collections::HashSet<_> = members.iter().map(|m| m.id).collect();
    for episode in processed {
        let contributes = episode_contributes(&episode, &member_ids);
        if contributes {
            let mut updated = episode;
            updated.advance_status(ConsolidationStatus::Abstracted);
            episodes.upsert(updated).await?;
        }
    }
    Ok(())
}

fn episode_contributes(
    episode: &Episode,
    member_ids: &std::collections::HashSet<cortex_core::ids::MemoryId>,
) -> bool {
    episode.derived_semantic_ids.iter().any(|id| member_ids.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{MemoryType, Provenance};
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    async fn stable_memory(
        store: &InMemoryStore,
        tenant_id: TenantId,
        agent_id: AgentId,
        content: &str,
        embedding: Vec<f32>,
    ) {
        let mut memory = Memory::new(
            tenant_id,
            agent_id,
            MemoryType::Preference,
            content,
            Provenance::User,
            0.8,
            0.01,
        );
        memory.embedding = Some(embedding);
        memory.created_at = Utc::now() - Duration::hours(48);
        store.upsert(memory).await.unwrap();
    }

    #[tokio::test]
    async fn five_similar_stable_memories_form_a_schema() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let reasoner = MockLanguageReasoner;

        for i in 0..5 {
            stable_memory(
                &store,
                tenant_id,
                agent_id,
                &format!("orders coffee every morning variant {i}"),
                vec![1.0, 0.0, 0.0],
            )
            .await;
        }

        let memories: Arc<dyn MemoryStore> = Arc::new(store.clone());
        let episodes: Arc<dyn EpisodeStore> = Arc::new(store.clone());
        let schemas: Arc<dyn SchemaStore> = Arc::new(store);
        let config = ConsolidationConfig::default();

        let outcome = detect_schemas(&reasoner, &memories, &episodes, &schemas, &config, tenant_id, agent_id)
            .await
            .unwrap();

        assert_eq!(outcome.detected, 1);
        assert_eq!(outcome.updated, 0);
    }

    #[tokio::test]
    async fn cluster_below_minimum_size_is_ignored() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();
        let reasoner = MockLanguageReasoner;

        for i in 0..3 {
            stable_memory(
                &store,
                tenant_id,
                agent_id,
                &format!("orders coffee every morning variant {i}"),
                vec![1.0, 0.0, 0.0],
            )
            .await;
        }

        let memories: Arc<dyn MemoryStore> = Arc::new(store.clone());
        let episodes: Arc<dyn EpisodeStore> = Arc::new(store.clone());
        let schemas: Arc<dyn SchemaStore> = Arc::new(store);
        let config = ConsolidationConfig::default();

        let outcome = detect_schemas(&reasoner, &memories, &episodes, &schemas, &config, tenant_id, agent_id)
            .await
            .unwrap();

        assert_eq!(outcome.detected, 0);
    }
}
