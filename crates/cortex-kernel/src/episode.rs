//! Episode encoding and recall (§3 Episode, §6 `/v1/episodes`).

use chrono::{DateTime, Utc};

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, EpisodeId, TenantId};
use cortex_core::models::{Episode, Outcome};

use crate::kernel::CortexKernel;

pub struct EncodeEpisodeParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub raw_content: String,
    pub occurred_at: DateTime<Utc>,
    pub conversation_id: Option<String>,
    pub message_sequence: Option<u64>,
}

pub struct RecordEpisodeOutcomeParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub episode_id: EpisodeId,
    pub outcome: Outcome,
}

pub struct RecallEpisodesParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub query: String,
    pub top_k: usize,
}

impl CortexKernel {
    /// Encodes raw experience (§4.5 step 1 "Episode selection" feeds on
    /// these). Embedding is best-effort: a failed embed still stores the
    /// episode, just without a vector for later recall.
    pub async fn encode_episode(&self, params: EncodeEpisodeParams) -> CortexResult<Episode> {
        let mut episode = Episode::new(params.tenant_id, params.agent_id, params.raw_content, params.occurred_at);
        episode.conversation_id = params.conversation_id;
        episode.message_sequence = params.message_sequence;
        episode.embedding = self.embeddings.embed(&episode.raw_content).await.ok();
        self.episodes.upsert(episode).await
    }

    pub async fn get_episode(&self, tenant_id: TenantId, agent_id: AgentId, id: EpisodeId) -> CortexResult<Episode> {
        self.episodes.get(tenant_id, agent_id, id).await
    }

    /// Sets a terminal outcome. `consolidation_status` is untouched here —
    /// it only advances through the consolidation pipeline (§3 Episode
    /// invariant: monotonic, never set directly by this operation).
    pub async fn record_episode_outcome(&self, params: RecordEpisodeOutcomeParams) -> CortexResult<Episode> {
        let mut episode = self
            .episodes
            .get(params.tenant_id, params.agent_id, params.episode_id)
            .await?;
        episode.outcome = Some(params.outcome);
        self.episodes.upsert(episode).await
    }

    pub async fn recall_episodes(&self, params: RecallEpisodesParams) -> CortexResult<Vec<Episode>> {
        let embedding = self.embeddings.embed(&params.query).await?;
        let hits = self
            .episodes
            .vector_search(params.tenant_id, params.agent_id, &embedding, params.top_k)
            .await?;

        let mut episodes = Vec::with_capacity(hits.len());
        for hit in hits {
            episodes.push(self.episodes.get(params.tenant_id, params.agent_id, hit.id).await?);
        }
        Ok(episodes)
    }
}
