//! §4.3 Hybrid recall and §6 `/v1/memories/extract` candidate extraction.

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::traits::CandidateMemory;
use cortex_retrieval::{RecallHit, RecallRequest};

use crate::kernel::CortexKernel;

pub struct RecallParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub query: String,
    pub top_k: usize,
    pub vector_weight: f64,
    pub graph_weight: f64,
    pub max_hops: u32,
    pub use_graph: bool,
    pub memory_type: Option<cortex_core::models::MemoryType>,
    pub min_confidence: f64,
    pub fallback_seed_ids: Vec<MemoryId>,
}

pub struct ExtractCandidatesParams {
    pub conversation: String,
}

impl CortexKernel {
    pub async fn recall(&self, params: RecallParams) -> CortexResult<Vec<RecallHit>> {
        let hits = self
            .recall
            .recall(RecallRequest {
                tenant_id: params.tenant_id,
                agent_id: params.agent_id,
                query: params.query,
                top_k: params.top_k,
                vector_weight: params.vector_weight,
                graph_weight: params.graph_weight,
                max_hops: params.max_hops,
                use_graph: params.use_graph,
                memory_type: params.memory_type,
                min_confidence: params.min_confidence,
                fallback_seed_ids: params.fallback_seed_ids,
            })
            .await?;
        self.metrics.recalls_served.incr();
        Ok(hits)
    }

    pub async fn extract_candidates(&self, params: ExtractCandidatesParams) -> CortexResult<Vec<CandidateMemory>> {
        self.reasoner.extract(&params.conversation).await
    }
}
