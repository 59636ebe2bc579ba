use super::{ConsolidationError, DecayError, EmbeddingError, GraphError, ReasonerError, StorageError};

/// Top-level error type for the Cortex memory engine.
///
/// Every subsystem error converts into this via `From`. Variants line up
/// 1:1 with the HTTP status table in the ingress adapter (`cortex-server`).
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("memory not found: {id}")]
    MemoryNotFound { id: String },

    #[error("not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("dependency unavailable: {message}")]
    DependencyUnavailable { message: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("reasoner error: {0}")]
    ReasonerError(#[from] ReasonerError),

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("consolidation error: {0}")]
    ConsolidationError(#[from] ConsolidationError),

    #[error("decay error: {0}")]
    DecayError(#[from] DecayError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CortexError {
    /// True when the kernel should attempt a degraded-mode fallback rather
    /// than fail the caller outright (§7 propagation policy).
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            CortexError::DependencyUnavailable { .. }
                | CortexError::EmbeddingError(_)
                | CortexError::ReasonerError(_)
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type CortexResult<T> = Result<T, CortexError>;
