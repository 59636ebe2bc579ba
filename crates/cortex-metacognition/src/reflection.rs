//! Strategy reflection — reviews learned procedures for ones that aren't
//! earning their keep, so a caller (or the agent itself) can decide to
//! retire or revise them.

use std::sync::Arc;

use cortex_core::errors::CortexResult;
use cortex_core::ids::{AgentId, ProcedureId, TenantId};
use cortex_core::traits::ProcedureStore;
use serde::{Deserialize, Serialize};

/// Below this success rate, with enough uses to be meaningful, a procedure
/// is flagged as underperforming.
const UNDERPERFORMING_SUCCESS_RATE: f64 = 0.4;
/// Minimum `use_count` before a success rate is considered statistically
/// meaningful rather than noise.
const MIN_USES_FOR_JUDGEMENT: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureAssessment {
    pub procedure_id: ProcedureId,
    pub use_count: u64,
    pub success_rate: f64,
    pub confidence: f64,
    pub underperforming: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReflection {
    pub procedures_reviewed: usize,
    pub underperforming: Vec<ProcedureAssessment>,
    pub unproven: Vec<ProcedureId>,
}

/// Reviews every procedure the agent has learned, splitting them into
/// `underperforming` (enough uses to judge, success rate below threshold)
/// and `unproven` (not enough uses yet to judge either way).
pub async fn reflect_on_strategies(
    procedures: &Arc<dyn ProcedureStore>,
    tenant_id: TenantId,
    agent_id: AgentId,
) -> CortexResult<StrategyReflection> {
    let all = procedures.list(tenant_id, agent_id).await?;

    let mut underperforming = Vec::new();
    let mut unproven = Vec::new();

    for procedure in &all {
        if procedure.use_count < MIN_USES_FOR_JUDGEMENT {
            unproven.push(procedure.id);
            continue;
        }
        let success_rate = procedure.success_rate();
        if success_rate < UNDERPERFORMING_SUCCESS_RATE {
            underperforming.push(ProcedureAssessment {
                procedure_id: procedure.id,
                use_count: procedure.use_count,
                success_rate,
                confidence: procedure.confidence,
                underperforming: true,
            });
        }
    }

    Ok(StrategyReflection {
        procedures_reviewed: all.len(),
        underperforming,
        unproven,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cortex_core::models::{Outcome, Procedure};
    use cortex_storage::InMemoryStore;

    #[tokio::test]
    async fn flags_low_success_procedures_with_enough_uses() {
        let store = Arc::new(InMemoryStore::default());
        let tenant_id = TenantId::new();
        let agent_id = AgentId::new();

        let mut weak = Procedure::new(tenant_id, agent_id, "greet", "say hi", "chat");
        for _ in 0..6 {
            weak.record_use(Outcome::Failure);
        }
        weak.record_use(Outcome::Success);
        let weak_id = weak.id;

        let mut fresh = Procedure::new(tenant_id, agent_id, "rare", "do thing", "tool");
        fresh.record_use(Outcome::Failure);
        let fresh_id = fresh.id;

        let procedures: Arc<dyn ProcedureStore> = store.clone();
        procedures.upsert(weak).await.unwrap();
        procedures.upsert(fresh).await.unwrap();

        let reflection = reflect_on_strategies(&procedures, tenant_id, agent_id).await.unwrap();

        assert_eq!(reflection.procedures_reviewed, 2);
        assert_eq!(reflection.underperforming.len(), 1);
        assert_eq!(reflection.underperforming[0].procedure_id, weak_id);
        assert_eq!(reflection.unproven, vec![fresh_id]);
    }
}
