use std::sync::Arc;

use cortex_core::config::{ReasonerConfig, ReasonerProviderKind};
use cortex_core::errors::CortexResult;
use cortex_core::traits::LanguageReasoner;

use crate::mock::MockLanguageReasoner;
use crate::openai_compatible::OpenAiCompatibleReasoner;

/// Builds the configured language reasoner. The only place in the
/// workspace that reads `ReasonerConfig::provider`.
pub fn build_reasoner(config: &ReasonerConfig) -> CortexResult<Arc<dyn LanguageReasoner>> {
    match config.provider {
        ReasonerProviderKind::Mock => Ok(Arc::new(MockLanguageReasoner)),
        ReasonerProviderKind::OpenAiCompatible => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            let api_key = config
                .api_key_env
                .as_ref()
                .and_then(|var| std::env::var(var).ok());
            let reasoner = OpenAiCompatibleReasoner::new(
                base_url,
                config.model.clone(),
                api_key,
                config.request_timeout_ms,
                config.max_retries,
            )?;
            Ok(Arc::new(reasoner))
        }
    }
}
