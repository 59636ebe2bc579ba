use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CortexResult;
use crate::models::{EntityType, FeedbackSignalType, MemoryType, MentionType, RelationType};

/// A memory the reasoner proposes extracting from a conversation turn
/// (§6 LanguageReasoner `Extract`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMemory {
    pub content: String,
    pub memory_type: MemoryType,
    pub evidence: String,
}

/// Structured enrichment for one raw episode (§6 `ExtractEpisodeStructure`,
/// consolidation step 2 "Enrich").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeStructure {
    pub entities: Vec<String>,
    pub topics: Vec<String>,
    pub causal_links: Vec<crate::models::CausalLink>,
    pub valence: f64,
    pub intensity: f64,
    pub importance_score: f64,
}

/// A candidate procedure distilled from a cluster of episodes (§6
/// `ExtractProcedure`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureCandidate {
    pub trigger_pattern: String,
    pub trigger_keywords: Vec<String>,
    pub action_template: String,
    pub action_type: String,
}

/// A named/described pattern found in a cluster of memories (§6
/// `DetectSchemaPattern`, consolidation step 5 "Schema detection").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaPattern {
    pub name: String,
    pub description: String,
    pub applicable_contexts: Vec<String>,
}

/// One implicit feedback item inferred from a conversation plus the
/// memories that were recalled into it (§6 `DetectImplicitFeedback`,
/// §4.5 "Implicit feedback"). Ids that don't resolve to a real memory are
/// silently dropped by the caller, not by the reasoner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplicitFeedbackItem {
    pub memory_id: String,
    pub signal_type: FeedbackSignalType,
    pub confidence: f64,
    pub evidence: String,
}

/// An entity mention found in free text (§6 `ExtractEntities`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub name: String,
    pub entity_type: EntityType,
    pub mention_type: MentionType,
}

/// A relationship proposed between two entities or memories (§6
/// `DetectRelationships`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRelationship {
    pub source: String,
    pub target: String,
    pub relation_type: RelationType,
    pub strength: f64,
}

/// The LLM-backed capability used for enrichment, contradiction checking,
/// summarization, and structure extraction (§6 LanguageReasoner). Every
/// call is independently cancelable; the kernel wraps each one in a
/// deadline and treats failure as non-fatal wherever a deterministic
/// fallback exists (§7 propagation policy).
#[async_trait]
pub trait LanguageReasoner: Send + Sync {
    async fn classify(&self, content: &str) -> CortexResult<MemoryType>;

    async fn extract(&self, conversation: &str) -> CortexResult<Vec<CandidateMemory>>;

    async fn summarize(&self, memories: &[String]) -> CortexResult<String>;

    async fn check_contradiction(&self, a: &str, b: &str) -> CortexResult<bool>;

    async fn extract_episode_structure(&self, raw_content: &str) -> CortexResult<EpisodeStructure>;

    async fn extract_procedure(&self, episode_contents: &[String]) -> CortexResult<ProcedureCandidate>;

    async fn detect_schema_pattern(&self, cluster_contents: &[String]) -> CortexResult<SchemaPattern>;

    async fn detect_implicit_feedback(
        &self,
        conversation: &str,
        recalled_memories: &[(String, String)],
    ) -> CortexResult<Vec<ImplicitFeedbackItem>>;

    async fn extract_entities(&self, text: &str) -> CortexResult<Vec<ExtractedEntity>>;

    async fn detect_relationships(
        &self,
        entities: &[ExtractedEntity],
        text: &str,
    ) -> CortexResult<Vec<ExtractedRelationship>>;
}
