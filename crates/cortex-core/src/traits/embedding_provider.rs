use async_trait::async_trait;

use crate::errors::CortexResult;

/// Produces vector embeddings for memory content (§6 EmbeddingProvider).
/// Implementations are injected as `Arc<dyn EmbeddingProvider>` so the
/// kernel never depends on a concrete HTTP client or model.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>>;
    fn dimensions(&self) -> usize;
}
