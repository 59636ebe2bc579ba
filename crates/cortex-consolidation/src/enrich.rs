//! §4.5 step 2 "Enrich".

use cortex_core::errors::CortexResult;
use cortex_core::models::{ConsolidationStatus, Episode};
use cortex_core::traits::LanguageReasoner;

/// Calls the reasoner's episode-structure extraction and merges the
/// result into `episode`, advancing it to `processed`. Returns `false`
/// (episode left untouched) if the reasoner call fails — the episode
/// stays `raw` and is retried on the next pass.
pub async fn enrich_episode(
    reasoner: &dyn LanguageReasoner,
    episode: &mut Episode,
) -> CortexResult<bool> {
    let structure = match reasoner.extract_episode_structure(&episode.raw_content).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(episode_id = %episode.id, error = %e, "episode enrichment failed; left raw for retry");
            return Ok(false);
        }
    };

    for entity in structure.entities {
        if !episode.entities.contains(&entity) {
            episode.entities.push(entity);
        }
    }
    for topic in structure.topics {
        if !episode.topics.contains(&topic) {
            episode.topics.push(topic);
        }
    }
    episode.causal_links.extend(structure.causal_links);
    episode.valence = structure.valence;
    episode.intensity = structure.intensity;
    episode.importance_score = structure.importance_score;
    episode.advance_status(ConsolidationStatus::Processed);
    Ok(true)
}
