/// Errors from the consolidation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("consolidation already in progress for agent {agent_id}")]
    AlreadyRunning { agent_id: String },

    #[error("belief merge failed: {reason}")]
    MergeFailed { reason: String },

    #[error("clustering failed: {reason}")]
    ClusteringFailed { reason: String },
}
