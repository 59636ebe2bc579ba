//! §4.5 step 1 "Select episodes".

use std::sync::Arc;

use chrono::Utc;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{ConsolidationStatus, Episode};
use cortex_core::traits::EpisodeStore;

use crate::result::ConsolidationScope;

pub async fn select_episodes(
    episodes: &Arc<dyn EpisodeStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
    scope: ConsolidationScope,
    max_episodes_per_run: usize,
) -> CortexResult<Vec<Episode>> {
    let mut raw = episodes
        .list_by_status(tenant_id, agent_id, ConsolidationStatus::Raw)
        .await?;

    if scope == ConsolidationScope::Recent {
        let cutoff = Utc::now() - chrono::Duration::hours(24);
        raw.retain(|e| e.occurred_at >= cutoff);
    }

    raw.sort_by_key(|e| e.occurred_at);
    raw.truncate(max_episodes_per_run);
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn recent_scope_excludes_episodes_older_than_a_day() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut old = Episode::new(tenant_id, agent_id, "old episode", Utc::now() - chrono::Duration::hours(30));
        old.consolidation_status = ConsolidationStatus::Raw;
        store.upsert(old).await.unwrap();

        let recent = Episode::new(tenant_id, agent_id, "recent episode", Utc::now());
        store.upsert(recent).await.unwrap();

        let episodes: Arc<dyn EpisodeStore> = Arc::new(store);
        let selected = select_episodes(&episodes, tenant_id, agent_id, ConsolidationScope::Recent, 100)
            .await
            .unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].raw_content, "recent episode");
    }

    #[tokio::test]
    async fn full_scope_includes_older_episodes() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let old = Episode::new(tenant_id, agent_id, "old episode", Utc::now() - chrono::Duration::hours(30));
        store.upsert(old).await.unwrap();

        let episodes: Arc<dyn EpisodeStore> = Arc::new(store);
        let selected = select_episodes(&episodes, tenant_id, agent_id, ConsolidationScope::Full, 100)
            .await
            .unwrap();

        assert_eq!(selected.len(), 1);
    }

    #[tokio::test]
    async fn max_episodes_per_run_caps_the_batch() {
        let store = InMemoryStore::default();
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        for i in 0..10 {
            let episode = Episode::new(tenant_id, agent_id, format!("episode {i}"), Utc::now());
            store.upsert(episode).await.unwrap();
        }

        let episodes: Arc<dyn EpisodeStore> = Arc::new(store);
        let selected = select_episodes(&episodes, tenant_id, agent_id, ConsolidationScope::Full, 4)
            .await
            .unwrap();

        assert_eq!(selected.len(), 4);
    }
}
