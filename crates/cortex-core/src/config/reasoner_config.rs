use serde::{Deserialize, Serialize};

/// Which language reasoner the kernel wires up at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonerProviderKind {
    Mock,
    OpenAiCompatible,
}

/// Configuration for the language-reasoning capability (§6 LanguageReasoner).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasonerConfig {
    pub provider: ReasonerProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        Self {
            provider: ReasonerProviderKind::Mock,
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            api_key_env: None,
            request_timeout_ms: 20_000,
            max_retries: 2,
        }
    }
}
