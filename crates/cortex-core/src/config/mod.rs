pub mod consolidation_config;
pub mod decay_config;
pub mod embedding_config;
pub mod observability_config;
pub mod policy_config;
pub mod reasoner_config;
pub mod retrieval_config;
pub mod server_config;
pub mod session_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use consolidation_config::ConsolidationConfig;
pub use decay_config::DecayConfig;
pub use embedding_config::{EmbeddingConfig, EmbeddingProviderKind};
pub use observability_config::ObservabilityConfig;
pub use policy_config::PolicyConfig;
pub use reasoner_config::{ReasonerConfig, ReasonerProviderKind};
pub use retrieval_config::RetrievalConfig;
pub use server_config::ServerConfig;
pub use session_config::SessionConfig;
pub use storage_config::StorageConfig;

/// Top-level configuration aggregating every subsystem config (§6
/// "Configuration"). No part of the kernel reads an ambient global; every
/// subsystem is constructed from its slice of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CortexConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub reasoner: ReasonerConfig,
    pub retrieval: RetrievalConfig,
    pub consolidation: ConsolidationConfig,
    pub decay: DecayConfig,
    pub session: SessionConfig,
    pub policy: PolicyConfig,
    pub observability: ObservabilityConfig,
    pub server: ServerConfig,
}

impl CortexConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load config from a TOML file on disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&raw)?)
    }
}
