//! §4.8 "Episode decay": `memory_strength *= exp(-decay_rate *
//! days_since_access)`; below the floor, the episode is archived
//! (terminal, per `ConsolidationStatus`).

use std::sync::Arc;

use chrono::Utc;
use cortex_confidence::arithmetic::episode_strength_decay;
use cortex_core::constants::EPISODE_ARCHIVE_STRENGTH_FLOOR;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::ConsolidationStatus;
use cortex_core::traits::EpisodeStore;

#[derive(Debug, Clone, Default)]
pub struct EpisodeDecayOutcome {
    pub decayed: u64,
    pub archived: u64,
}

pub async fn decay_episodes(
    episodes: &Arc<dyn EpisodeStore>,
    decay_rate: f64,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<EpisodeDecayOutcome> {
    let mut outcome = EpisodeDecayOutcome::default();
    let all = episodes.list(tenant_id, agent_id).await?;

    for mut episode in all {
        if episode.consolidation_status == ConsolidationStatus::Archived {
            continue;
        }

        let days_since_access = (Utc::now() - episode.last_accessed_at).num_seconds() as f64 / 86_400.0;
        episode.memory_strength = episode_strength_decay(episode.memory_strength, decay_rate, days_since_access);
        outcome.decayed += 1;

        if episode.memory_strength < EPISODE_ARCHIVE_STRENGTH_FLOOR {
            episode.advance_status(ConsolidationStatus::Archived);
            outcome.archived += 1;
        }

        episodes.upsert(episode).await?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use cortex_core::models::Episode;
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn long_unaccessed_episode_is_archived() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut episode = Episode::new(tenant_id, agent_id, "old conversation", Utc::now() - Duration::days(90));
        episode.last_accessed_at = Utc::now() - Duration::days(90);
        store.upsert(episode).await.unwrap();

        let episodes: Arc<dyn EpisodeStore> = Arc::new(store);
        let outcome = decay_episodes(&episodes, 0.05, tenant_id, agent_id).await.unwrap();

        assert_eq!(outcome.archived, 1);
    }

    #[tokio::test]
    async fn recently_accessed_episode_keeps_strength() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let episode = Episode::new(tenant_id, agent_id, "recent conversation", Utc::now());
        store.upsert(episode).await.unwrap();

        let episodes: Arc<dyn EpisodeStore> = Arc::new(store);
        let outcome = decay_episodes(&episodes, 0.05, tenant_id, agent_id).await.unwrap();

        assert_eq!(outcome.decayed, 1);
        assert_eq!(outcome.archived, 0);
    }
}
