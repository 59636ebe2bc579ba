use async_trait::async_trait;

use cortex_core::errors::CortexResult;
use cortex_core::models::{CausalLink, EntityType, FeedbackSignalType, MemoryType, MentionType};
use cortex_core::traits::{
    CandidateMemory, EpisodeStructure, ExtractedEntity, ExtractedRelationship,
    ImplicitFeedbackItem, LanguageReasoner, ProcedureCandidate, SchemaPattern,
};

/// Dependency-free, heuristic reasoner for tests and for running the
/// kernel without a real LLM configured. Every method returns a
/// deterministic, simplistic-but-valid answer derived from surface text
/// features (capitalization, punctuation, word overlap) rather than
/// anything resembling real language understanding.
pub struct MockLanguageReasoner;

#[async_trait]
impl LanguageReasoner for MockLanguageReasoner {
    async fn classify(&self, content: &str) -> CortexResult<MemoryType> {
        let lower = content.to_lowercase();
        Ok(if lower.contains("always") || lower.contains("never") || lower.contains("must") {
            MemoryType::Constraint
        } else if lower.contains("decided") || lower.contains("chose") || lower.contains("will") {
            MemoryType::Decision
        } else if lower.contains("prefer") || lower.contains("like") || lower.contains("favorite") {
            MemoryType::Preference
        } else {
            MemoryType::Fact
        })
    }

    async fn extract(&self, conversation: &str) -> CortexResult<Vec<CandidateMemory>> {
        let mut out = Vec::new();
        for sentence in conversation.split(['.', '\n']) {
            let sentence = sentence.trim();
            if sentence.len() < 8 {
                continue;
            }
            let memory_type = self.classify(sentence).await?;
            out.push(CandidateMemory {
                content: sentence.to_string(),
                memory_type,
                evidence: sentence.to_string(),
            });
        }
        Ok(out)
    }

    async fn summarize(&self, memories: &[String]) -> CortexResult<String> {
        Ok(memories.join("; "))
    }

    async fn check_contradiction(&self, a: &str, b: &str) -> CortexResult<bool> {
        let negations = ["not", "never", "no longer", "isn't", "doesn't", "stopped"];
        let a_neg = negations.iter().any(|n| a.to_lowercase().contains(n));
        let b_neg = negations.iter().any(|n| b.to_lowercase().contains(n));
        let shared_words = word_overlap(a, b);
        Ok(a_neg != b_neg && shared_words >= 2)
    }

    async fn extract_episode_structure(&self, raw_content: &str) -> CortexResult<EpisodeStructure> {
        let entities = capitalized_tokens(raw_content);
        let topics: Vec<String> = raw_content
            .split_whitespace()
            .filter(|w| w.len() > 6)
            .take(5)
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let lower = raw_content.to_lowercase();
        let valence = if lower.contains("great") || lower.contains("good") || lower.contains("happy") {
            0.5
        } else if lower.contains("bad") || lower.contains("failed") || lower.contains("frustrat") {
            -0.5
        } else {
            0.0
        };
        Ok(EpisodeStructure {
            entities,
            topics,
            causal_links: extract_causal_links(raw_content),
            valence,
            intensity: valence.abs(),
            importance_score: (raw_content.split_whitespace().count() as f64 / 100.0).min(1.0),
        })
    }

    async fn extract_procedure(&self, episode_contents: &[String]) -> CortexResult<ProcedureCandidate> {
        let trigger_pattern = episode_contents
            .first()
            .cloned()
            .unwrap_or_default();
        Ok(ProcedureCandidate {
            trigger_keywords: trigger_pattern
                .split_whitespace()
                .filter(|w| w.len() > 4)
                .take(5)
                .map(|w| w.to_lowercase())
                .collect(),
            trigger_pattern,
            action_template: episode_contents.last().cloned().unwrap_or_default(),
            action_type: "respond".to_string(),
        })
    }

    async fn detect_schema_pattern(&self, cluster_contents: &[String]) -> CortexResult<SchemaPattern> {
        let name = cluster_contents
            .first()
            .map(|s| s.split_whitespace().take(3).collect::<Vec<_>>().join("_").to_lowercase())
            .unwrap_or_else(|| "pattern".to_string());
        Ok(SchemaPattern {
            name,
            description: format!("Pattern observed across {} memories", cluster_contents.len()),
            applicable_contexts: Vec::new(),
        })
    }

    async fn detect_implicit_feedback(
        &self,
        conversation: &str,
        recalled_memories: &[(String, String)],
    ) -> CortexResult<Vec<ImplicitFeedbackItem>> {
        let lower = conversation.to_lowercase();
        let mut out = Vec::new();
        for (memory_id, content) in recalled_memories {
            let overlap = word_overlap(&lower, &content.to_lowercase());
            if overlap == 0 {
                continue;
            }
            let signal_type = if lower.contains("thanks") || lower.contains("exactly") {
                FeedbackSignalType::Helpful
            } else if lower.contains("wrong") || lower.contains("not right") {
                FeedbackSignalType::Unhelpful
            } else {
                FeedbackSignalType::Used
            };
            out.push(ImplicitFeedbackItem {
                memory_id: memory_id.clone(),
                signal_type,
                confidence: (overlap as f64 / 10.0).min(1.0),
                evidence: conversation.to_string(),
            });
        }
        Ok(out)
    }

    async fn extract_entities(&self, text: &str) -> CortexResult<Vec<ExtractedEntity>> {
        Ok(capitalized_tokens(text)
            .into_iter()
            .map(|name| ExtractedEntity {
                name,
                entity_type: EntityType::Other,
                mention_type: MentionType::Context,
            })
            .collect())
    }

    async fn detect_relationships(
        &self,
        entities: &[ExtractedEntity],
        _text: &str,
    ) -> CortexResult<Vec<ExtractedRelationship>> {
        let mut out = Vec::new();
        for window in entities.windows(2) {
            out.push(ExtractedRelationship {
                source: window[0].name.clone(),
                target: window[1].name.clone(),
                relation_type: cortex_core::models::RelationType::EntityLink,
                strength: 0.5,
            });
        }
        Ok(out)
    }
}

fn word_overlap(a: &str, b: &str) -> usize {
    let a_words: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let b_words: std::collections::HashSet<&str> = b.split_whitespace().collect();
    a_words.intersection(&b_words).count()
}

fn capitalized_tokens(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) && w.len() > 1)
        .filter(|w| seen.insert(w.to_string()))
        .map(|w| w.to_string())
        .collect()
}

fn extract_causal_links(text: &str) -> Vec<CausalLink> {
    let mut links = Vec::new();
    for marker in ["because", "so that", "which caused", "led to"] {
        if let Some(idx) = text.to_lowercase().find(marker) {
            let (cause, effect) = text.split_at(idx);
            links.push(CausalLink {
                cause: cause.trim().to_string(),
                effect: effect[marker.len()..].trim().to_string(),
                confidence: 0.5,
            });
        }
    }
    links
}
