//! `LearningEngine` — the facade callers (the kernel, the HTTP layer) use
//! for both feedback paths (§4.9, C12).

use std::sync::Arc;

use cortex_confidence::ConfidenceEngine;
use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{FeedbackSignalType, Memory};
use cortex_core::traits::{FeedbackStore, LanguageReasoner, MemoryStore};

use crate::explicit::record_explicit;
use crate::implicit::detect_and_apply_implicit;

pub struct LearningEngine {
    memories: Arc<dyn MemoryStore>,
    feedback: Arc<dyn FeedbackStore>,
    confidence: ConfidenceEngine,
    reasoner: Arc<dyn LanguageReasoner>,
}

impl LearningEngine {
    pub fn new(
        memories: Arc<dyn MemoryStore>,
        feedback: Arc<dyn FeedbackStore>,
        confidence: ConfidenceEngine,
        reasoner: Arc<dyn LanguageReasoner>,
    ) -> Self {
        Self { memories, feedback, confidence, reasoner }
    }

    pub async fn record_explicit_feedback(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        memory_id: MemoryId,
        signal_type: FeedbackSignalType,
        context: Option<String>,
    ) -> CortexResult<Memory> {
        record_explicit(
            &self.memories,
            &self.feedback,
            &self.confidence,
            tenant_id,
            agent_id,
            memory_id,
            signal_type,
            context,
        )
        .await
    }

    pub async fn process_implicit_feedback(
        &self,
        tenant_id: TenantId,
        agent_id: AgentId,
        conversation: &str,
        recalled: &[(MemoryId, String)],
    ) -> CortexResult<Vec<Memory>> {
        detect_and_apply_implicit(
            &self.memories,
            &self.feedback,
            &self.confidence,
            &self.reasoner,
            tenant_id,
            agent_id,
            conversation,
            recalled,
        )
        .await
    }
}
