//! §4.9 explicit and implicit feedback (§6 `/v1/feedback`).

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, MemoryId, TenantId};
use cortex_core::models::{FeedbackSignalType, Memory};

use crate::kernel::CortexKernel;

pub struct SubmitFeedbackParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub memory_id: MemoryId,
    pub signal_type: FeedbackSignalType,
    pub context: Option<String>,
}

pub struct ProcessImplicitParams {
    pub tenant_id: TenantId,
    pub agent_id: AgentId,
    pub conversation: String,
    /// Memories recalled into this conversation turn, paired with their
    /// content, as the reasoner needs both to infer implicit signals.
    pub recalled: Vec<(MemoryId, String)>,
}

impl CortexKernel {
    pub async fn submit_feedback(&self, params: SubmitFeedbackParams) -> CortexResult<Memory> {
        let scope = cortex_core::ids::AgentScope::new(params.tenant_id, params.agent_id);
        let _guard = self.locks.acquire(scope).await;

        let result = self
            .learning
            .record_explicit_feedback(
                params.tenant_id,
                params.agent_id,
                params.memory_id,
                params.signal_type,
                params.context,
            )
            .await?;

        match params.signal_type {
            FeedbackSignalType::Helpful | FeedbackSignalType::Used => self.metrics.reinforcements.incr(),
            FeedbackSignalType::Unhelpful | FeedbackSignalType::Ignored | FeedbackSignalType::Outdated => {
                self.metrics.penalizations.incr()
            }
            FeedbackSignalType::Contradicted => self.metrics.contradictions_detected.incr(),
        }

        Ok(result)
    }

    pub async fn process_implicit_feedback(&self, params: ProcessImplicitParams) -> CortexResult<Vec<Memory>> {
        let scope = cortex_core::ids::AgentScope::new(params.tenant_id, params.agent_id);
        let _guard = self.locks.acquire(scope).await;

        self.learning
            .process_implicit_feedback(params.tenant_id, params.agent_id, &params.conversation, &params.recalled)
            .await
    }
}
