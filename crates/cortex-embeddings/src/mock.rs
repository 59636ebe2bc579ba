use async_trait::async_trait;

use cortex_core::errors::CortexResult;
use cortex_core::traits::EmbeddingProvider;

/// Deterministic, dependency-free embedding provider for tests and for
/// running the kernel without a real model configured. Hashes the input
/// text into a fixed-size vector so identical content always embeds
/// identically and similar prefixes land close together.
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> CortexResult<Vec<f32>> {
        Ok(hash_embed(text, self.dimensions))
    }

    async fn embed_batch(&self, texts: &[String]) -> CortexResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| hash_embed(t, self.dimensions)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Token-hash bag-of-words embedding: each whitespace token is hashed into
/// a bucket and accumulated, then the vector is L2-normalized.
fn hash_embed(text: &str, dimensions: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; dimensions];
    for token in text.split_whitespace() {
        let mut hash: u64 = 1469598103934665603; // FNV offset basis
        for b in token.as_bytes() {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(1099511628211);
        }
        let bucket = (hash as usize) % dimensions;
        v[bucket] += 1.0;
    }
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_embeds_identically() {
        let provider = MockEmbeddingProvider::new(32);
        let a = provider.embed("hello world").await.unwrap();
        let b = provider.embed("hello world").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[tokio::test]
    async fn different_text_usually_differs() {
        let provider = MockEmbeddingProvider::new(32);
        let a = provider.embed("hello world").await.unwrap();
        let b = provider.embed("goodbye moon").await.unwrap();
        assert_ne!(a, b);
    }
}
