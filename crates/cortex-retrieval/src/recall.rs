use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{Memory, MemoryType};
use cortex_core::traits::{EmbeddingProvider, GraphStore, MemoryStore};
use cortex_graph::activation::{spreading_activation, DEFAULT_FANOUT_LIMIT};

/// §4.3 recall input.
pub struct RecallRequest {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub query: String,
    pub top_k: usize,
    pub vector_weight: f64,
    pub graph_weight: f64,
    pub max_hops: u32,
    pub use_graph: bool,
    pub memory_type: Option<MemoryType>,
    pub min_confidence: f64,
    /// Caller-supplied seed memory ids used for graph-only recall when the
    /// embedding provider is unavailable (§4.3 "Failure").
    pub fallback_seed_ids: Vec<MemoryId>,
}

/// One scored result (§4.3 step 3 "Score fusion").
#[derive(Debug, Clone, serde::Serialize)]
pub struct RecallHit {
    pub memory: Memory,
    pub vector_score: f64,
    pub graph_score: f64,
    pub final_score: f64,
}

/// §4.3 Hybrid recall pipeline (C6).
pub struct RecallPipeline {
    embeddings: Arc<dyn EmbeddingProvider>,
    memories: Arc<dyn MemoryStore>,
    graph: Arc<dyn GraphStore>,
    confidence: Arc<ConfidenceEngine>,
}

impl RecallPipeline {
    pub fn new(
        embeddings: Arc<dyn EmbeddingProvider>,
        memories: Arc<dyn MemoryStore>,
        graph: Arc<dyn GraphStore>,
        confidence: Arc<ConfidenceEngine>,
    ) -> Self {
        Self { embeddings, memories, graph, confidence }
    }

    pub async fn recall(&self, req: RecallRequest) -> CortexResult<Vec<RecallHit>> {
        let candidate_k = (req.top_k * 3).max(30);

        // Step 1: vector candidates. An embedding failure degrades to
        // graph-only recall when the caller supplied fallback seeds;
        // otherwise recall is unavailable (§4.3 "Failure").
        let embedding = match self.embeddings.embed(&req.query).await {
            Ok(v) => Some(v),
            Err(e) if req.use_graph && !req.fallback_seed_ids.is_empty() => {
                tracing::warn!(error = %e, "embedding provider unavailable, degrading to graph-only recall");
                None
            }
            Err(e) => return Err(e),
        };

        let mut all_memories = self.memories.list(req.tenant_id, req.agent_id).await?;
        if let Some(memory_type) = req.memory_type {
            all_memories.retain(|m| m.memory_type == memory_type);
        }
        all_memories.retain(|m| m.confidence >= req.min_confidence);

        let mut vector_scores: std::collections::HashMap<MemoryId, f64> = std::collections::HashMap::new();
        if let Some(query_embedding) = &embedding {
            let hits = self
                .memories
                .vector_search(req.tenant_id, req.agent_id, query_embedding, candidate_k)
                .await?;
            for hit in hits {
                vector_scores.insert(hit.id, hit.similarity.max(0.0));
            }
        }

        // Step 2: graph expansion, seeded from vector candidates (or the
        // caller-supplied fallback seeds when vector recall degraded).
        let mut graph_scores: std::collections::HashMap<String, f64> = std::collections::HashMap::new();
        let seeds: Vec<(String, f64)> = if !vector_scores.is_empty() {
            vector_scores.iter().map(|(id, score)| (id.to_string(), *score)).collect()
        } else {
            req.fallback_seed_ids.iter().map(|id| (id.to_string(), 1.0)).collect()
        };
        if req.use_graph && !seeds.is_empty() {
            let result = spreading_activation(
                self.graph.as_ref(),
                &seeds,
                req.max_hops,
                DEFAULT_FANOUT_LIMIT,
                None,
            )
            .await?;
            graph_scores = result.activation;
        }

        let by_id: std::collections::HashMap<MemoryId, &Memory> =
            all_memories.iter().map(|m| (m.id, m)).collect();

        // Step 3: score fusion over the union of vector and graph hits.
        let mut ids: std::collections::HashSet<MemoryId> = vector_scores.keys().copied().collect();
        for node_id in graph_scores.keys() {
            if let Ok(id) = MemoryId::parse(node_id) {
                if by_id.contains_key(&id) {
                    ids.insert(id);
                }
            }
        }

        let mut hits: Vec<RecallHit> = ids
            .into_iter()
            .filter_map(|id| {
                let memory = (*by_id.get(&id)?).clone();
                let vector_score = vector_scores.get(&id).copied().unwrap_or(0.0);
                let graph_score = graph_scores.get(&id.to_string()).copied().unwrap_or(0.0);
                let final_score = req.vector_weight * vector_score + req.graph_weight * graph_score;
                Some(RecallHit { memory, vector_score, graph_score, final_score })
            })
            .collect();

        // Step 4: tie-breaks — final desc, confidence desc, last_accessed_at desc, id asc.
        hits.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.memory.confidence.partial_cmp(&a.memory.confidence).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| b.memory.last_accessed_at.cmp(&a.memory.last_accessed_at))
                .then_with(|| a.memory.id.cmp(&b.memory.id))
        });

        // Step 5: top-K cut, then record access as a side effect.
        hits.truncate(req.top_k);
        for hit in &hits {
            if let Err(e) = self
                .confidence
                .access_boost(req.tenant_id, req.agent_id, hit.memory.id, cortex_core::constants::ACCESS_BOOST)
                .await
            {
                tracing::warn!(memory_id = %hit.memory.id, error = %e, "access boost side effect failed");
            }
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use cortex_confidence::ConfidenceEngine;
    use cortex_core::ids::{AgentId, TenantId};
    use cortex_core::models::{MemoryType, Provenance};
    use cortex_storage::InMemoryStore;

    struct FixedEmbeddingProvider {
        vector: Vec<f32>,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for FixedEmbeddingProvider {
        async fn embed(&self, _text: &str) -> CortexResult<Vec<f32>> {
            Ok(self.vector.clone())
        }
        async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.vector.clone()).collect())
        }
        fn dimensions(&self) -> usize {
            self.vector.len()
        }
    }

    fn make_memory(tenant_id: TenantId, agent_id: AgentId, embedding: Vec<f32>, confidence: f64) -> Memory {
        let mut memory = Memory::new(tenant_id, agent_id, MemoryType::Fact, "content", Provenance::User, confidence, 0.01);
        memory.embedding = Some(embedding);
        memory
    }

    #[tokio::test]
    async fn recall_orders_by_final_score_and_breaks_ties_on_confidence() {
        let store = Arc::new(InMemoryStore::new());
        let memories: Arc<dyn MemoryStore> = store.clone();
        let graph: Arc<dyn GraphStore> = store.clone();
        let mutation_log: Arc<dyn cortex_core::traits::MutationLogStore> = store.clone();
        let confidence = Arc::new(ConfidenceEngine::new(memories.clone(), mutation_log));
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(FixedEmbeddingProvider { vector: vec![1.0, 0.0] });

        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        // Exact match on the query axis: highest similarity.
        let best = make_memory(tenant_id, agent_id, vec![1.0, 0.0], 0.5);
        // Same similarity as a third memory below but higher confidence: wins the tie.
        let tied_high_confidence = make_memory(tenant_id, agent_id, vec![0.8, 0.6], 0.9);
        let tied_low_confidence = make_memory(tenant_id, agent_id, vec![0.8, 0.6], 0.2);
        // Orthogonal to the query: lowest similarity, still returned (not dropped).
        let worst = make_memory(tenant_id, agent_id, vec![0.0, 1.0], 0.5);

        for memory in [&best, &tied_high_confidence, &tied_low_confidence, &worst] {
            memories.upsert(memory.clone()).await.unwrap();
        }

        let pipeline = RecallPipeline::new(embeddings, memories, graph, confidence);
        let hits = pipeline
            .recall(RecallRequest {
                tenant_id,
                agent_id,
                query: "anything".to_string(),
                top_k: 4,
                vector_weight: 1.0,
                graph_weight: 0.0,
                max_hops: 2,
                use_graph: false,
                memory_type: None,
                min_confidence: 0.0,
                fallback_seed_ids: Vec::new(),
            })
            .await
            .unwrap();

        let ids: Vec<_> = hits.iter().map(|h| h.memory.id).collect();
        assert_eq!(ids, vec![best.id, tied_high_confidence.id, tied_low_confidence.id, worst.id]);
        assert!(hits[0].final_score > hits[1].final_score);
        assert_eq!(hits[1].final_score, hits[2].final_score);
    }

    #[tokio::test]
    async fn recall_respects_min_confidence_and_top_k() {
        let store = Arc::new(InMemoryStore::new());
        let memories: Arc<dyn MemoryStore> = store.clone();
        let graph: Arc<dyn GraphStore> = store.clone();
        let mutation_log: Arc<dyn cortex_core::traits::MutationLogStore> = store.clone();
        let confidence = Arc::new(ConfidenceEngine::new(memories.clone(), mutation_log));
        let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(FixedEmbeddingProvider { vector: vec![1.0, 0.0] });

        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let kept = make_memory(tenant_id, agent_id, vec![1.0, 0.0], 0.8);
        let mut filtered = make_memory(tenant_id, agent_id, vec![1.0, 0.0], 0.1);
        filtered.last_accessed_at -= Duration::hours(1);

        memories.upsert(kept.clone()).await.unwrap();
        memories.upsert(filtered).await.unwrap();

        let pipeline = RecallPipeline::new(embeddings, memories, graph, confidence);
        let hits = pipeline
            .recall(RecallRequest {
                tenant_id,
                agent_id,
                query: "anything".to_string(),
                top_k: 10,
                vector_weight: 1.0,
                graph_weight: 0.0,
                max_hops: 2,
                use_graph: false,
                memory_type: None,
                min_confidence: 0.5,
                fallback_seed_ids: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].memory.id, kept.id);
    }
}
