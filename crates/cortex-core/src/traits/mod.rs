//! Capability interfaces (§5, §6). The kernel depends only on these
//! traits; adapters for each concrete provider or persistence backend live
//! in their own crates and are injected as `Arc<dyn Trait>`.

pub mod embedding_provider;
pub mod language_reasoner;
pub mod store;

pub use embedding_provider::EmbeddingProvider;
pub use language_reasoner::{
    CandidateMemory, EpisodeStructure, ExtractedEntity, ExtractedRelationship,
    ImplicitFeedbackItem, LanguageReasoner, ProcedureCandidate, SchemaPattern,
};
pub use store::{
    AgentStore, ContradictionStore, EntityStore, EpisodeStore, FeedbackStore, GraphStore,
    MemoryStore, MutationLogStore, ProcedureStore, SchemaStore, SimilarityHit, TenantStore,
    WorkingMemoryStore,
};
