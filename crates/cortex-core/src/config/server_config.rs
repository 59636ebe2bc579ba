use serde::{Deserialize, Serialize};

/// Ingress-adapter configuration (§6 "Configuration"). The kernel never
/// reads this; only `cortex-server`'s startup code and its rate-limit
/// layer do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            rate_limit_rps: 50,
            rate_limit_burst: 100,
            request_timeout_ms: 30_000,
        }
    }
}
