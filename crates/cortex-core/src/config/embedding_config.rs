use serde::{Deserialize, Serialize};

/// Which embedding provider the kernel wires up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    Mock,
    OpenAiCompatible,
}

/// Configuration for the embedding capability (§6 EmbeddingProvider).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    pub dimensions: usize,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Mock,
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            base_url: None,
            api_key_env: None,
            request_timeout_ms: 10_000,
            max_retries: 2,
        }
    }
}
