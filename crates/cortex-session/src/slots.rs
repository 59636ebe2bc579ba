//! §4.4 step 4 "slot competition".

use cortex_core::models::{ActiveSchema, MemoryKind, SlotOccupant};

use crate::pool::PoolCandidate;

/// Fill up to `max_slots` from `pool`, sorted by score desc, enforcing:
/// - no more than `ceil(max_slots/2)` occupants of any single `memory_kind`
/// - at least one `Episode` occupant if any episode candidate scored above
///   `min_episode_score`
pub fn select_occupants(
    mut pool: Vec<PoolCandidate>,
    max_slots: usize,
    min_episode_score: f64,
) -> Vec<SlotOccupant> {
    pool.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(std::cmp::Ordering::Equal));

    let per_kind_cap = max_slots.div_ceil(2);
    let best_episode = pool
        .iter()
        .filter(|c| c.memory_kind == MemoryKind::Episode && c.score() >= min_episode_score)
        .max_by(|a, b| a.score().partial_cmp(&b.score()).unwrap_or(std::cmp::Ordering::Equal))
        .cloned();

    let mut selected: Vec<PoolCandidate> = Vec::new();
    let mut kind_counts: std::collections::HashMap<MemoryKind, usize> =
        std::collections::HashMap::new();

    if let Some(episode) = &best_episode {
        selected.push(episode.clone());
        *kind_counts.entry(MemoryKind::Episode).or_insert(0) += 1;
    }

    for candidate in pool {
        if selected.len() >= max_slots {
            break;
        }
        if let Some(ref episode) = best_episode {
            if candidate.occupant_id == episode.occupant_id && candidate.memory_kind == episode.memory_kind {
                continue;
            }
        }
        let count = kind_counts.entry(candidate.memory_kind).or_insert(0);
        if *count >= per_kind_cap {
            continue;
        }
        *count += 1;
        selected.push(candidate);
    }

    selected
        .into_iter()
        .enumerate()
        .map(|(position, c)| SlotOccupant {
            memory_kind: c.memory_kind,
            occupant_id: c.occupant_id,
            activation_level: c.score(),
            activation_source: c.activation_source,
            activation_cue: c.activation_cue,
            slot_position: position,
        })
        .collect()
}

/// §4.4 step 6 "assembled context" — deterministic layout.
pub fn assemble_context(
    goal: Option<&str>,
    active_schemas: &[(ActiveSchema, String)],
    occupants: &[(SlotOccupant, String)],
) -> String {
    let mut out = String::new();
    out.push_str(goal.unwrap_or(""));
    out.push('\n');
    let schema_summary: Vec<String> = active_schemas
        .iter()
        .map(|(schema, name)| format!("{name} ({:.2})", schema.match_score))
        .collect();
    out.push_str(&schema_summary.join(", "));
    out.push('\n');
    let occupant_lines: Vec<String> = occupants
        .iter()
        .map(|(occ, summary)| format!("[{}] {summary}", occ.slot_position))
        .collect();
    out.push_str(&occupant_lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::ActivationSource;

    fn candidate(kind: MemoryKind, id: &str, score_inputs: f64) -> PoolCandidate {
        PoolCandidate {
            memory_kind: kind,
            occupant_id: id.to_string(),
            vector_sim: score_inputs,
            graph_act: 0.0,
            recency: 0.0,
            confidence: 0.0,
            activation_source: ActivationSource::Direct,
            activation_cue: String::new(),
        }
    }

    #[test]
    fn diversity_cap_limits_a_single_kind() {
        let pool: Vec<PoolCandidate> = (0..5)
            .map(|i| candidate(MemoryKind::Semantic, &format!("m{i}"), 1.0 - i as f64 * 0.01))
            .collect();
        let occupants = select_occupants(pool, 4, 0.9);
        assert_eq!(occupants.len(), 2); // ceil(4/2) cap for one kind
    }

    #[test]
    fn high_scoring_episode_is_guaranteed_a_slot() {
        let mut pool: Vec<PoolCandidate> = (0..4)
            .map(|i| candidate(MemoryKind::Semantic, &format!("m{i}"), 0.9 - i as f64 * 0.01))
            .collect();
        pool.push(candidate(MemoryKind::Episode, "e0", 0.5));
        let occupants = select_occupants(pool, 4, 0.3);
        assert!(occupants.iter().any(|o| o.memory_kind == MemoryKind::Episode));
    }
}
