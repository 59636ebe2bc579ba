//! §4.5 step 4 "Procedure learning".

use std::sync::Arc;

use cortex_confidence::arithmetic::reinforce as reinforce_score;
use cortex_core::config::ConsolidationConfig;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, TenantId};
use cortex_core::models::{Episode, ExampleExchange, Outcome, Procedure};
use cortex_core::traits::{EmbeddingProvider, LanguageReasoner, ProcedureStore};
use tracing::warn;

use crate::util::cosine;

#[derive(Debug, Clone, Default)]
pub struct ProcedureOutcome {
    pub learned: u64,
    pub reinforced: u64,
}

/// Only fires for episodes with a successful outcome and a trigger/action
/// shape the reasoner can actually name (§4.5 step 4).
pub async fn process_episode_procedure(
    reasoner: &dyn LanguageReasoner,
    embeddings: &dyn EmbeddingProvider,
    procedures: &Arc<dyn ProcedureStore>,
    config: &ConsolidationConfig,
    tenant_id: TenantId,
    agent_id: AgentId,
    episode: &Episode,
) -> CortexResult<ProcedureOutcome> {
    let mut outcome = ProcedureOutcome::default();

    if episode.outcome != Some(Outcome::Success) {
        return Ok(outcome);
    }

    let sentences = split_sentences(&episode.raw_content);
    let candidate = match reasoner.extract_procedure(&sentences).await {
        Ok(c) => c,
        Err(e) => {
            warn!(episode_id = %episode.id, error = %e, "no coherent trigger/action shape; skipping procedure learning");
            return Ok(outcome);
        }
    };

    let trigger_embedding = match embeddings.embed(&candidate.trigger_pattern).await {
        Ok(e) => e,
        Err(e) => {
            warn!(error = %e, "embedding unavailable; skipping procedure learning");
            return Ok(outcome);
        }
    };

    let existing = procedures.list(tenant_id, agent_id).await?;
    let best = existing
        .iter()
        .filter_map(|p| {
            p.trigger_embedding
                .as_ref()
                .map(|e| (p, cosine(&trigger_embedding, e)))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let example = ExampleExchange {
        trigger_text: episode.raw_content.clone(),
        action_text: candidate.action_template.clone(),
        occurred_at: episode.occurred_at,
    };

    match best {
        Some((matched, sim)) if sim >= config.similar_threshold => {
            let mut updated = matched.clone();
            updated.record_use(Outcome::Success);
            updated.confidence = reinforce_score(updated.confidence);
            updated.examples.push(example);
            updated.derived_from_episodes.push(episode.id);
            procedures.upsert(updated).await?;
            outcome.reinforced += 1;
        }
        _ => {
            let mut procedure = Procedure::new(
                tenant_id,
                agent_id,
                candidate.trigger_pattern,
                candidate.action_template,
                candidate.action_type,
            );
            procedure.trigger_keywords = candidate.trigger_keywords;
            procedure.trigger_embedding = Some(trigger_embedding);
            procedure.derived_from_episodes.push(episode.id);
            procedure.examples.push(example);
            procedures.upsert(procedure).await?;
            outcome.learned += 1;
        }
    }

    Ok(outcome)
}

/// Splits a raw episode into trigger/action candidate sentences the same
/// way the reasoner splits a conversation when extracting beliefs — the
/// first sentence is what prompted the episode, the last is the response.
fn split_sentences(raw_content: &str) -> Vec<String> {
    raw_content
        .split(['.', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::ids::{AgentId, TenantId};
    use cortex_embeddings::MockEmbeddingProvider;
    use cortex_reasoner::MockLanguageReasoner;
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn successful_episode_learns_a_new_procedure() {
        let store: Arc<dyn ProcedureStore> = Arc::new(InMemoryStore::default());
        let embeddings = MockEmbeddingProvider::new(32);
        let reasoner = MockLanguageReasoner;
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut episode = Episode::new(
            tenant_id,
            agent_id,
            "Customer asked for refund. Processed refund immediately.".to_string(),
            chrono::Utc::now(),
        );
        episode.outcome = Some(Outcome::Success);
        let config = ConsolidationConfig::default();

        let outcome = process_episode_procedure(&reasoner, &embeddings, &store, &config, tenant_id, agent_id, &episode)
            .await
            .unwrap();

        assert_eq!(outcome.learned, 1);
        assert_eq!(outcome.reinforced, 0);
    }

    #[tokio::test]
    async fn failed_outcome_skips_procedure_learning() {
        let store: Arc<dyn ProcedureStore> = Arc::new(InMemoryStore::default());
        let embeddings = MockEmbeddingProvider::new(32);
        let reasoner = MockLanguageReasoner;
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut episode = Episode::new(
            tenant_id,
            agent_id,
            "Customer asked for refund. Refund was denied.".to_string(),
            chrono::Utc::now(),
        );
        episode.outcome = Some(Outcome::Failure);
        let config = ConsolidationConfig::default();

        let outcome = process_episode_procedure(&reasoner, &embeddings, &store, &config, tenant_id, agent_id, &episode)
            .await
            .unwrap();

        assert_eq!(outcome.learned, 0);
        assert_eq!(outcome.reinforced, 0);
    }

    #[tokio::test]
    async fn matching_trigger_reinforces_existing_procedure() {
        let store = Arc::new(InMemoryStore::default());
        let embeddings = MockEmbeddingProvider::new(32);
        let reasoner = MockLanguageReasoner;
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let trigger = "Customer asked for refund";
        let mut existing = Procedure::new(tenant_id, agent_id, trigger, "Process refund", "respond");
        existing.trigger_embedding = Some(embeddings.embed(trigger).await.unwrap());
        store.upsert(existing).await.unwrap();

        let mut episode = Episode::new(
            tenant_id,
            agent_id,
            format!("{trigger}. Processed refund immediately."),
            chrono::Utc::now(),
        );
        episode.outcome = Some(Outcome::Success);
        let config = ConsolidationConfig::default();

        let procedures: Arc<dyn ProcedureStore> = store.clone();
        let outcome = process_episode_procedure(&reasoner, &embeddings, &procedures, &config, tenant_id, agent_id, &episode)
            .await
            .unwrap();

        assert_eq!(outcome.reinforced, 1);
        assert_eq!(outcome.learned, 0);
    }
}
