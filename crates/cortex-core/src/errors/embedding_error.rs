/// Errors from the embedding provider capability.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding request failed: {message}")]
    Request { message: String },
}
