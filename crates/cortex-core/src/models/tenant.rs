use crate::ids::TenantId;
use serde::{Deserialize, Serialize};

/// A tenant owns agents and authenticates requests (§3 Tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    /// SHA-256 hash of the API key; the raw key is never persisted.
    pub api_key_hash: String,
}
