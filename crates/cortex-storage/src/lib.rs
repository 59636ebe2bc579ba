//! In-memory reference adapter for the persistence capability (§6
//! "Persistence engine"). Backs every per-kind store trait from
//! `cortex_core::traits` with `DashMap`s and brute-force cosine k-NN.
//! This is the default adapter used by tests and by the kernel when no
//! external backend is configured; production deployments can swap in a
//! different implementation of the same traits without touching the
//! kernel.

mod similarity;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use cortex_core::errors::{CortexResult, StorageError};
use cortex_core::ids::{AgentId, EntityId, EpisodeId, MemoryId, ProcedureId, SchemaId, SessionId, TenantId};
use cortex_core::models::{
    Agent, Contradiction, ConsolidationStatus, Entity, Episode, FeedbackSignal, GraphEdge, Memory,
    MemoryType, Mention, MutationLogEntry, Procedure, RelationType, Schema, SchemaType, Tenant,
    WorkingMemorySession,
};
use cortex_core::traits::{
    AgentStore, ContradictionStore, EntityStore, EpisodeStore, FeedbackStore, GraphStore,
    MemoryStore, MutationLogStore, ProcedureStore, SchemaStore, SimilarityHit, TenantStore,
    WorkingMemoryStore,
};

use similarity::top_k_by_similarity;

type AgentKey = (TenantId, AgentId);

/// One in-memory store for every persisted entity kind. Cheap to clone
/// (everything behind `Arc`/`DashMap`); construct once per process and
/// share it across every trait-object handle the kernel holds.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tenants: Arc<DashMap<TenantId, Tenant>>,
    tenants_by_key_hash: Arc<DashMap<String, TenantId>>,
    agents: Arc<DashMap<AgentId, Agent>>,
    agents_by_external_id: Arc<DashMap<(TenantId, String), AgentId>>,
    memories: Arc<DashMap<MemoryId, Memory>>,
    episodes: Arc<DashMap<EpisodeId, Episode>>,
    procedures: Arc<DashMap<ProcedureId, Procedure>>,
    schemas: Arc<DashMap<SchemaId, Schema>>,
    entities: Arc<DashMap<EntityId, Entity>>,
    mentions: Arc<DashMap<MemoryId, Vec<Mention>>>,
    edges: Arc<DashMap<(String, String, RelationTypeKey), GraphEdge>>,
    sessions: Arc<DashMap<SessionId, WorkingMemorySession>>,
    sessions_by_agent: Arc<DashMap<AgentKey, SessionId>>,
    mutation_log: Arc<DashMap<MemoryId, Vec<MutationLogEntry>>>,
    feedback: Arc<DashMap<MemoryId, Vec<FeedbackSignal>>>,
    contradictions: Arc<DashMap<MemoryId, Vec<Contradiction>>>,
}

type RelationTypeKey = RelationType;

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn create(&self, tenant: Tenant) -> CortexResult<Tenant> {
        self.tenants_by_key_hash
            .insert(tenant.api_key_hash.clone(), tenant.id);
        self.tenants.insert(tenant.id, tenant.clone());
        Ok(tenant)
    }

    async fn get(&self, id: TenantId) -> CortexResult<Tenant> {
        self.tenants
            .get(&id)
            .map(|t| t.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "tenant".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn find_by_api_key_hash(&self, api_key_hash: &str) -> CortexResult<Option<Tenant>> {
        let id = self.tenants_by_key_hash.get(api_key_hash).map(|r| *r);
        Ok(match id {
            Some(id) => self.tenants.get(&id).map(|t| t.clone()),
            None => None,
        })
    }
}

#[async_trait]
impl AgentStore for InMemoryStore {
    async fn create(&self, agent: Agent) -> CortexResult<Agent> {
        self.agents_by_external_id.insert(
            (agent.tenant_id, agent.external_id.clone()),
            agent.id,
        );
        self.agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    async fn get(&self, tenant_id: TenantId, id: AgentId) -> CortexResult<Agent> {
        self.agents
            .get(&id)
            .filter(|a| a.tenant_id == tenant_id)
            .map(|a| a.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "agent".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn find_by_external_id(
        &self,
        tenant_id: TenantId,
        external_id: &str,
    ) -> CortexResult<Option<Agent>> {
        let id = self
            .agents_by_external_id
            .get(&(tenant_id, external_id.to_string()))
            .map(|r| *r);
        Ok(match id {
            Some(id) => self.agents.get(&id).map(|a| a.clone()),
            None => None,
        })
    }

    async fn list_all(&self) -> CortexResult<Vec<Agent>> {
        Ok(self.agents.iter().map(|a| a.clone()).collect())
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn upsert(&self, memory: Memory) -> CortexResult<Memory> {
        self.memories.insert(memory.id, memory.clone());
        Ok(memory)
    }

    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<Memory> {
        self.memories
            .get(&id)
            .filter(|m| m.tenant_id == tenant_id && m.agent_id == agent_id)
            .map(|m| m.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "memory".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn delete(&self, tenant_id: TenantId, agent_id: AgentId, id: MemoryId) -> CortexResult<()> {
        let matches = self
            .memories
            .get(&id)
            .map(|m| m.tenant_id == tenant_id && m.agent_id == agent_id)
            .unwrap_or(false);
        if matches {
            self.memories.remove(&id);
        }
        Ok(())
    }

    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Memory>> {
        Ok(self
            .memories
            .iter()
            .filter(|m| m.tenant_id == tenant_id && m.agent_id == agent_id)
            .map(|m| m.clone())
            .collect())
    }

    async fn list_by_type(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_type: MemoryType,
    ) -> CortexResult<Vec<Memory>> {
        Ok(self
            .memories
            .iter()
            .filter(|m| m.tenant_id == tenant_id && m.agent_id == agent_id && m.memory_type == memory_type)
            .map(|m| m.clone())
            .collect())
    }

    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<MemoryId>>> {
        let candidates = self
            .memories
            .iter()
            .filter(|m| m.tenant_id == tenant_id && m.agent_id == agent_id)
            .map(|m| (m.id, m.embedding.clone()));
        Ok(top_k_by_similarity(query_embedding, candidates, k)
            .into_iter()
            .map(|(id, similarity)| SimilarityHit { id, similarity })
            .collect())
    }
}

#[async_trait]
impl EpisodeStore for InMemoryStore {
    async fn upsert(&self, episode: Episode) -> CortexResult<Episode> {
        self.episodes.insert(episode.id, episode.clone());
        Ok(episode)
    }

    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: EpisodeId) -> CortexResult<Episode> {
        self.episodes
            .get(&id)
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id)
            .map(|e| e.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "episode".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Episode>> {
        Ok(self
            .episodes
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id)
            .map(|e| e.clone())
            .collect())
    }

    async fn list_by_status(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        status: ConsolidationStatus,
    ) -> CortexResult<Vec<Episode>> {
        Ok(self
            .episodes
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id && e.consolidation_status == status)
            .map(|e| e.clone())
            .collect())
    }

    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<EpisodeId>>> {
        let candidates = self
            .episodes
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id)
            .map(|e| (e.id, e.embedding.clone()));
        Ok(top_k_by_similarity(query_embedding, candidates, k)
            .into_iter()
            .map(|(id, similarity)| SimilarityHit { id, similarity })
            .collect())
    }
}

#[async_trait]
impl ProcedureStore for InMemoryStore {
    async fn upsert(&self, procedure: Procedure) -> CortexResult<Procedure> {
        self.procedures.insert(procedure.id, procedure.clone());
        Ok(procedure)
    }

    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: ProcedureId) -> CortexResult<Procedure> {
        self.procedures
            .get(&id)
            .filter(|p| p.tenant_id == tenant_id && p.agent_id == agent_id)
            .map(|p| p.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "procedure".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Procedure>> {
        Ok(self
            .procedures
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.agent_id == agent_id)
            .map(|p| p.clone())
            .collect())
    }

    async fn vector_search(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        query_embedding: &[f32],
        k: usize,
    ) -> CortexResult<Vec<SimilarityHit<ProcedureId>>> {
        let candidates = self
            .procedures
            .iter()
            .filter(|p| p.tenant_id == tenant_id && p.agent_id == agent_id)
            .map(|p| (p.id, p.trigger_embedding.clone()));
        Ok(top_k_by_similarity(query_embedding, candidates, k)
            .into_iter()
            .map(|(id, similarity)| SimilarityHit { id, similarity })
            .collect())
    }
}

#[async_trait]
impl SchemaStore for InMemoryStore {
    async fn upsert(&self, schema: Schema) -> CortexResult<Schema> {
        self.schemas.insert(schema.id, schema.clone());
        Ok(schema)
    }

    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<Schema> {
        self.schemas
            .get(&id)
            .filter(|s| s.tenant_id == tenant_id && s.agent_id == agent_id)
            .map(|s| s.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "schema".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn find_by_type_and_name(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        schema_type: SchemaType,
        name: &str,
    ) -> CortexResult<Option<Schema>> {
        Ok(self
            .schemas
            .iter()
            .find(|s| {
                s.tenant_id == tenant_id
                    && s.agent_id == agent_id
                    && s.schema_type == schema_type
                    && s.name == name
            })
            .map(|s| s.clone()))
    }

    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Schema>> {
        Ok(self
            .schemas
            .iter()
            .filter(|s| s.tenant_id == tenant_id && s.agent_id == agent_id)
            .map(|s| s.clone())
            .collect())
    }

    async fn delete(&self, tenant_id: TenantId, agent_id: AgentId, id: SchemaId) -> CortexResult<()> {
        let matches = self
            .schemas
            .get(&id)
            .map(|s| s.tenant_id == tenant_id && s.agent_id == agent_id)
            .unwrap_or(false);
        if matches {
            self.schemas.remove(&id);
        }
        Ok(())
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn upsert(&self, entity: Entity) -> CortexResult<Entity> {
        self.entities.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn find_by_name(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        name: &str,
    ) -> CortexResult<Option<Entity>> {
        Ok(self
            .entities
            .iter()
            .find(|e| e.tenant_id == tenant_id && e.agent_id == agent_id && e.name == name)
            .map(|e| e.clone()))
    }

    async fn get(&self, tenant_id: TenantId, agent_id: AgentId, id: EntityId) -> CortexResult<Entity> {
        self.entities
            .get(&id)
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id)
            .map(|e| e.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "entity".to_string(),
                id: id.to_string(),
            }.into())
    }

    async fn list(&self, tenant_id: TenantId, agent_id: AgentId) -> CortexResult<Vec<Entity>> {
        Ok(self
            .entities
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.agent_id == agent_id)
            .map(|e| e.clone())
            .collect())
    }

    async fn add_mention(&self, mention: Mention) -> CortexResult<()> {
        self.mentions.entry(mention.memory_id).or_default().push(mention);
        Ok(())
    }

    async fn mentions_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<Mention>> {
        Ok(self
            .mentions
            .get(&memory_id)
            .map(|m| m.clone())
            .unwrap_or_default())
    }

    async fn mentions_for_entity(&self, entity_id: EntityId) -> CortexResult<Vec<Mention>> {
        Ok(self
            .mentions
            .iter()
            .flat_map(|entry| entry.value().clone())
            .filter(|m| m.entity_id == entity_id)
            .collect())
    }
}

#[async_trait]
impl GraphStore for InMemoryStore {
    async fn upsert_edge(&self, edge: GraphEdge) -> CortexResult<GraphEdge> {
        self.edges.insert(
            (edge.source_id.clone(), edge.target_id.clone(), edge.relation_type),
            edge.clone(),
        );
        if cortex_core::constants::is_symmetric(edge.relation_type) {
            let mut reverse = edge.clone();
            std::mem::swap(&mut reverse.source_id, &mut reverse.target_id);
            self.edges.insert(
                (reverse.source_id.clone(), reverse.target_id.clone(), reverse.relation_type),
                reverse,
            );
        }
        Ok(edge)
    }

    async fn get_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<Option<GraphEdge>> {
        Ok(self
            .edges
            .get(&(source_id.to_string(), target_id.to_string(), relation_type))
            .map(|e| e.clone()))
    }

    async fn edges_from(&self, node_id: &str) -> CortexResult<Vec<GraphEdge>> {
        Ok(self
            .edges
            .iter()
            .filter(|e| e.key().0 == node_id)
            .map(|e| e.clone())
            .collect())
    }

    async fn record_traversal(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<()> {
        if let Some(mut edge) = self
            .edges
            .get_mut(&(source_id.to_string(), target_id.to_string(), relation_type))
        {
            edge.traversal_count += 1;
            edge.last_traversed_at = Some(chrono::Utc::now());
        }
        Ok(())
    }

    async fn all_edges(&self, _tenant_id: TenantId, _agent_id: AgentId) -> CortexResult<Vec<GraphEdge>> {
        // Edges are keyed by opaque node id, not by tenant/agent; the graph
        // builder is responsible for only ever writing edges between nodes
        // that belong to one agent.
        Ok(self.edges.iter().map(|e| e.clone()).collect())
    }

    async fn delete_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relation_type: RelationType,
    ) -> CortexResult<()> {
        self.edges.remove(&(source_id.to_string(), target_id.to_string(), relation_type));
        if cortex_core::constants::is_symmetric(relation_type) {
            self.edges.remove(&(target_id.to_string(), source_id.to_string(), relation_type));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkingMemoryStore for InMemoryStore {
    async fn get_or_create(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        max_slots: usize,
    ) -> CortexResult<WorkingMemorySession> {
        if let Some(id) = self.sessions_by_agent.get(&(tenant_id, agent_id)).map(|r| *r) {
            if let Some(session) = self.sessions.get(&id) {
                return Ok(session.clone());
            }
        }
        let session = WorkingMemorySession::new(tenant_id, agent_id, max_slots);
        self.sessions_by_agent.insert((tenant_id, agent_id), session.id);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn save(&self, session: WorkingMemorySession) -> CortexResult<WorkingMemorySession> {
        self.sessions_by_agent
            .insert((session.tenant_id, session.agent_id), session.id);
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: SessionId) -> CortexResult<WorkingMemorySession> {
        self.sessions
            .get(&id)
            .map(|s| s.clone())
            .ok_or_else(|| StorageError::NotFound {
                kind: "working_memory_session".to_string(),
                id: id.to_string(),
            }.into())
    }
}

#[async_trait]
impl MutationLogStore for InMemoryStore {
    async fn append(&self, entry: MutationLogEntry) -> CortexResult<()> {
        self.mutation_log.entry(entry.memory_id).or_default().push(entry);
        Ok(())
    }

    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<MutationLogEntry>> {
        Ok(self
            .mutation_log
            .get(&memory_id)
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl FeedbackStore for InMemoryStore {
    async fn append(&self, signal: FeedbackSignal) -> CortexResult<()> {
        self.feedback.entry(signal.memory_id).or_default().push(signal);
        Ok(())
    }

    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<FeedbackSignal>> {
        Ok(self.feedback.get(&memory_id).map(|v| v.clone()).unwrap_or_default())
    }
}

#[async_trait]
impl ContradictionStore for InMemoryStore {
    async fn append(&self, contradiction: Contradiction) -> CortexResult<()> {
        self.contradictions
            .entry(contradiction.belief_id)
            .or_default()
            .push(contradiction);
        Ok(())
    }

    async fn list_for_memory(&self, memory_id: MemoryId) -> CortexResult<Vec<Contradiction>> {
        Ok(self
            .contradictions
            .get(&memory_id)
            .map(|v| v.clone())
            .unwrap_or_default())
    }
}

#[allow(unused)]
fn _assert_send_sync(store: &InMemoryStore) {
    fn assert<T: Send + Sync>(_: &T) {}
    assert(store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::Provenance;

    fn ids() -> (TenantId, AgentId) {
        (TenantId::new(), AgentId::new())
    }

    #[tokio::test]
    async fn memory_roundtrip_is_scoped_to_agent() {
        let store = InMemoryStore::new();
        let (tenant, agent) = ids();
        let other_agent = AgentId::new();
        let memory = Memory::new(tenant, agent, MemoryType::Fact, "likes rust", Provenance::User, 0.8, 0.01);
        let id = memory.id;
        store.upsert(memory).await.unwrap();

        assert!(store.get(tenant, agent, id).await.is_ok());
        assert!(store.get(tenant, other_agent, id).await.is_err());
    }

    #[tokio::test]
    async fn vector_search_ranks_by_cosine_similarity() {
        let store = InMemoryStore::new();
        let (tenant, agent) = ids();
        let mut near = Memory::new(tenant, agent, MemoryType::Fact, "a", Provenance::User, 0.8, 0.01);
        near.embedding = Some(vec![1.0, 0.0]);
        let mut far = Memory::new(tenant, agent, MemoryType::Fact, "b", Provenance::User, 0.8, 0.01);
        far.embedding = Some(vec![0.0, 1.0]);
        store.upsert(near.clone()).await.unwrap();
        store.upsert(far).await.unwrap();

        let hits = store.vector_search(tenant, agent, &[1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].id, near.id);
    }

    #[tokio::test]
    async fn symmetric_edges_are_mirrored() {
        let store = InMemoryStore::new();
        let edge = GraphEdge::new("a", "b", RelationType::EntityLink, 0.9);
        store.upsert_edge(edge).await.unwrap();
        let back = store.get_edge("b", "a", RelationType::EntityLink).await.unwrap();
        assert!(back.is_some());
    }
}
