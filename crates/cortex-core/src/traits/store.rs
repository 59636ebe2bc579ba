use async_trait::async_trait;

use crate::errors::CortexResult;
use crate::ids::{AgentId, EntityId, EpisodeId, MemoryId, ProcedureId, SchemaId, SessionId, TenantId};
use crate::models::{
    Agent, Contradiction, Entity, Episode, FeedbackSignal, GraphEdge, Memory, Mention,
    MutationLogEntry, Procedure, RelationType, Schema, Tenant, WorkingMemorySession,
};

/// A vector similarity hit: an id paired with its cosine similarity to the
/// query embedding, highest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityHit<Id> {
    pub id: Id,
    pub similarity: f64,
}

/// Tenant directory (§3 Tenant, §6 `/v1/tenants`).
#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn create(&self, tenant: Tenant) -> CortexResult<Tenant>;
    async fn get(&self, id: TenantId) -> CortexResult<Tenant>;
    async fn find_by_api_key_hash(&self, api_key_hash: &str) -> CortexResult<Option<Tenant>>;
}

/// Agent directory (§3 Agent, §6 `/v1/agents`).
#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn create(&self, agent: Agent) -> CortexResult<Agent>;
    async fn get(&self, tenant_id: TenantId, id: AgentId) -> CortexResult<Agent>;
    async fn find_by_external_id(
        &self,
        tenant_id: TenantId,
        external_id: &str,
    ) -> CortexResult<Option<Agent>>;
    /// Every agent across every tenant — used by background schedulers
    /// (decay, consolidation) to enumerate per-agent work.
    async fn list_all(&self) -> CortexResult<Vec<Agent>>;
}

/// Semantic memory store — row storage plus cosine k-NN (§3 Memory, §6
/// "Persistence engine").
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn upsert(&self, memory: Memory) -> CortexResult<Memory>;
    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<Memory>;
    async fn delete(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<()>;
    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Memory>>;
    async fn list_by_type(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_type: crate::models::MemoryType,
    ) -> CortexResult<Vec<Memory>>;
    /// Cosine k-NN against stored embeddings, restricted to one agent.
    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<MemoryId>>>;
}

/// Episode store (§3 Episode).
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    async fn upsert(&self, episode: Episode) -> CortexResult<Episode>;
    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: EpisodeId) -> CortexResult<Episode>;
    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Episode>>;
    async fn list_by_status(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        status: crate::models::ConsolidationStatus,
    ) -> CortexResult<Vec<Episode>>;
    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<EpisodeId>>>;
}

/// Procedural memory store (§3 Procedure).
#[async_trait]
pub trait ProcedureStore: Send + Sync {
    async fn upsert(&self, procedure: Procedure) -> CortexResult<Procedure>;
    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: ProcedureId) -> CortexResult<Procedure>;
    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Procedure>>;
    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<ProcedureId>>>;
}

/// Schema store (§3 Schema).
#[async_trait]
pub trait SchemaStore: Send + Sync {
    async fn upsert(&self, schema: Schema) -> CortexResult<Schema>;
    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<Schema>;
    async fn find_by_type_and_name(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        schema_type: crate::models::SchemaType,
        name: &str,
    ) -> CortexResult<Option<Schema>>;
    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Schema>>;
    async fn delete(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<()>;
}

/// Entity and mention store (§3 Entity, §3 Mention).
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn upsert(&self, entity: Entity) -> CortexResult<Entity>;
    async fn find_by_name(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        name: &str,
    ) -> CortexResult<Option<Entity>>;
    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: EntityId) -> CortexResult<Entity>;
    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Entity>>;
    async fn add_mention(&self, mention: Mention) -> CortexResult<()>;
    async fn mentions_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<Mention>>;
    /// Every memory that mentions `entity_id` — used by the graph builder
    /// to find co-mention pairs when a new memory is created (§4.2).
    async fn mentions_for_entity(&self, entity_id: EntityId) -> CortexResult<Vec<Mention>>;
}

/// Graph edge store (§3 Graph edge, §4.2). Nodes are addressed by opaque
/// string id so the graph doesn't need to know which kind of memory a
/// node represents.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn upsert_edge(&self, edge: GraphEdge) -> CortexResult<GraphEdge>;
    async fn get_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<Option<GraphEdge>>;
    async fn edges_from(&self, node_id: &str) -> CortexResult<Vec<GraphEdge>>;
    async fn record_traversal(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<()>;
    async fn all_edges(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<GraphEdge>>;
    async fn delete_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<()>;
}

/// Working memory store — one session per `(tenant, agent)` (§3 Working
/// memory, §4.4).
#[async_trait]
pub trait WorkingMemoryStore: Send + Sync {
    async fn get_or_create(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        max_slots: usize,
    ) -> CortexResult<WorkingMemorySession>;
    async fn save(&self, session: WorkingMemorySession) -> CortexResult<WorkingMemorySession>;
    async fn get(&self, id: SessionId) -> CortexResult<WorkingMemorySession>;
}

/// Append-only mutation log (§3 Mutation log entry). Writes are
/// best-effort: a failure here must never roll back the state mutation it
/// records (§7 propagation policy).
#[async_trait]
pub trait MutationLogStore: Send + Sync {
    async fn append(&self, entry: MutationLogEntry) -> CortexResult<()>;
    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<MutationLogEntry>>;
}

/// Feedback signal store (§3 Feedback signal).
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn append(&self, signal: FeedbackSignal) -> CortexResult<()>;
    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<FeedbackSignal>>;
}

/// Contradiction record store (§3 Contradiction).
#[async_trait]
pub trait ContradictionStore: Send + Sync {
    async fn append(&self, contradiction: Contradiction) -> CortexResult<()>;
    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<Contradiction>>;
}
