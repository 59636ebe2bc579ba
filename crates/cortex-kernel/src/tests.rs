use std::sync::Arc;

use cortex_core::config::CortexConfig;
use cortex_core::models::{FeedbackSignalType, MemoryType, Provenance};
use cortex_core::traits::{EmbeddingProvider, LanguageReasoner};
use cortex_embeddings::MockEmbeddingProvider;
use cortex_reasoner::MockLanguageReasoner;
use cortex_storage::InMemoryStore;

use crate::kernel::CortexKernel;
use crate::memory::CreateMemoryParams;
use crate::tenant::CreateTenantResult;

fn harness() -> Arc<CortexKernel> {
    let store = Arc::new(InMemoryStore::default());
    let embeddings: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(32));
    let reasoner: Arc<dyn LanguageReasoner> = Arc::new(MockLanguageReasoner);
    CortexKernel::new(CortexConfig::default(), store, embeddings, reasoner)
}

fn memory_params(
    tenant_id: cortex_core::ids::TenantId,
    agent_id: cortex_core::ids::AgentId,
    content: &str,
) -> CreateMemoryParams {
    CreateMemoryParams {
        tenant_id,
        agent_id,
        memory_type: MemoryType::Preference,
        content: content.to_string(),
        provenance: Provenance::User,
        confidence: 0.7,
        expires_at: None,
    }
}

#[tokio::test]
async fn create_tenant_then_authenticate_roundtrips() {
    let kernel = harness();
    let CreateTenantResult { tenant, api_key } = kernel.create_tenant("acme").await.unwrap();

    let authenticated = kernel.authenticate(&api_key).await.unwrap();
    assert_eq!(authenticated.id, tenant.id);

    let err = kernel.authenticate("not-the-right-key").await;
    assert!(err.is_err());
}

#[tokio::test]
async fn create_agent_rejects_duplicate_external_id() {
    let kernel = harness();
    let tenant = kernel.create_tenant("acme").await.unwrap().tenant;

    let params = crate::agent::CreateAgentParams {
        tenant_id: tenant.id,
        external_id: "agent-1".to_string(),
        name: "First".to_string(),
        metadata: Default::default(),
    };
    kernel.create_agent(params).await.unwrap();

    let dup = crate::agent::CreateAgentParams {
        tenant_id: tenant.id,
        external_id: "agent-1".to_string(),
        name: "Second".to_string(),
        metadata: Default::default(),
    };
    assert!(kernel.create_agent(dup).await.is_err());
}

#[tokio::test]
async fn create_memory_deduplicates_near_identical_content() {
    let kernel = harness();
    let tenant = kernel.create_tenant("acme").await.unwrap().tenant;
    let agent = kernel
        .create_agent(crate::agent::CreateAgentParams {
            tenant_id: tenant.id,
            external_id: "agent-1".to_string(),
            name: "A".to_string(),
            metadata: Default::default(),
        })
        .await
        .unwrap();

    let first = kernel
        .create_memory(memory_params(tenant.id, agent.id, "User prefers dark mode"))
        .await
        .unwrap();
    assert!(!first.reinforced);

    let second = kernel
        .create_memory(memory_params(tenant.id, agent.id, "User prefers dark mode"))
        .await
        .unwrap();
    assert!(second.reinforced);
    assert_eq!(second.memory.id, first.memory.id);
    assert!(second.memory.confidence > first.memory.confidence);
}

#[tokio::test]
async fn submit_feedback_adjusts_confidence() {
    let kernel = harness();
    let tenant = kernel.create_tenant("acme").await.unwrap().tenant;
    let agent = kernel
        .create_agent(crate::agent::CreateAgentParams {
            tenant_id: tenant.id,
            external_id: "agent-1".to_string(),
            name: "A".to_string(),
            metadata: Default::default(),
        })
        .await
        .unwrap();

    let created = kernel
        .create_memory(memory_params(tenant.id, agent.id, "User prefers concise answers"))
        .await
        .unwrap();

    let fed = kernel
        .submit_feedback(crate::feedback::SubmitFeedbackParams {
            tenant_id: tenant.id,
            agent_id: agent.id,
            memory_id: created.memory.id,
            signal_type: FeedbackSignalType::Helpful,
            context: None,
        })
        .await
        .unwrap();

    assert!(fed.confidence > created.memory.confidence);
}

#[tokio::test]
async fn health_reports_zero_ticks_before_any_scheduler_run() {
    let kernel = harness();
    let health = kernel.health();
    assert_eq!(health.status, "ok");
    assert!(health.last_consolidation_tick.is_none());
    assert!(health.last_decay_tick.is_none());
}
