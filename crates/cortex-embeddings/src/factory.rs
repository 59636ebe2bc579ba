use std::sync::Arc;

use cortex_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use cortex_core::errors::CortexResult;
use cortex_core::traits::EmbeddingProvider;

use crate::mock::MockEmbeddingProvider;
use crate::openai_compatible::OpenAiCompatibleEmbeddingProvider;

/// Builds the configured embedding provider. This is the only place in
/// the workspace that reads `EmbeddingConfig::provider` — everything else
/// depends on the `EmbeddingProvider` trait.
pub fn build_embedding_provider(config: &EmbeddingConfig) -> CortexResult<Arc<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingProviderKind::Mock => Ok(Arc::new(MockEmbeddingProvider::new(config.dimensions))),
        EmbeddingProviderKind::OpenAiCompatible => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            let api_key = config
                .api_key_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok());
            let provider = OpenAiCompatibleEmbeddingProvider::new(
                base_url,
                config.model.clone(),
                api_key,
                config.dimensions,
                config.request_timeout_ms,
                config.max_retries,
            )?;
            Ok(Arc::new(provider))
        }
    }
}
