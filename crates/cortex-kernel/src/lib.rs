//! The cognitive-memory kernel: one facade owning every subsystem,
//! serializing per-agent mutations, and enforcing request deadlines (§2, §5).
//! `cortex-server` is the only intended caller of this crate.

mod activation;
mod agent;
mod cognitive;
mod episode;
mod feedback;
mod health;
mod kernel;
mod locks;
mod memory;
mod mind;
mod procedure;
mod recall;
mod schema;
mod tenant;

pub use cortex_core::errors::{CortexError, CortexResult};

pub use health::{HealthSnapshot, MetricsSnapshot};
pub use kernel::{CortexKernel, CortexStore};
pub use locks::AgentLocks;

pub use activation::{ActivateParams, SetGoalParams};
pub use agent::{CreateAgentParams, PoliciesParams};
pub use cognitive::ReflectParams;
pub use episode::{EncodeEpisodeParams, RecallEpisodesParams, RecordEpisodeOutcomeParams};
pub use feedback::{ProcessImplicitParams, SubmitFeedbackParams};
pub use memory::{CreateMemoryOutcome, CreateMemoryParams};
pub use mind::{MindSnapshot, TierDistribution};
pub use procedure::{LearnProcedureParams, MatchProceduresParams, RecordProcedureOutcomeParams};
pub use recall::{ExtractCandidatesParams, RecallParams};
pub use schema::{ContradictSchemaParams, MatchSchemasParams};
pub use tenant::CreateTenantResult;

#[cfg(test)]
mod tests;
