use serde::{Deserialize, Serialize};

/// Configuration for the hybrid recall pipeline (§4.3 / C6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub vector_candidate_k: usize,
    pub graph_expansion_hops: u32,
    pub graph_expansion_fanout: usize,
    pub vector_weight: f64,
    pub graph_weight: f64,
    pub recency_weight: f64,
    pub confidence_weight: f64,
    pub top_k_default: usize,
    pub top_k_max: usize,
    pub access_boost_on_retrieval: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            vector_candidate_k: 50,
            graph_expansion_hops: 2,
            graph_expansion_fanout: 10,
            vector_weight: 0.45,
            graph_weight: 0.25,
            recency_weight: 0.15,
            confidence_weight: 0.15,
            top_k_default: 10,
            top_k_max: 100,
            access_boost_on_retrieval: true,
        }
    }
}
