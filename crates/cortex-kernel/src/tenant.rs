//! Tenant directory and API-key authentication (§3 Tenant, §6 `/v1/tenants`).

use cortex_core::errors::{CortexError, CortexResult};
use cortex_core::ids::TenantId;
use cortex_core::models::Tenant;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::kernel::CortexKernel;

/// `create_tenant`'s raw API key is returned exactly once; only its hash
/// is ever persisted (§3 Tenant `api_key_hash`).
pub struct CreateTenantResult {
    pub tenant: Tenant,
    pub api_key: String,
}

fn hash_api_key(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Constant-time comparison of two hex digests, to avoid leaking timing
/// information about how much of a presented key matched.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl CortexKernel {
    pub async fn create_tenant(&self, name: impl Into<String>) -> CortexResult<CreateTenantResult> {
        let api_key = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let tenant = Tenant {
            id: TenantId::new(),
            name: name.into(),
            api_key_hash: hash_api_key(&api_key),
        };
        let tenant = self.tenants.create(tenant).await?;
        Ok(CreateTenantResult { tenant, api_key })
    }

    pub async fn get_tenant(&self, id: TenantId) -> CortexResult<Tenant> {
        self.tenants.get(id).await
    }

    /// Resolves a presented Bearer token to its owning tenant (§6 "Auth").
    pub async fn authenticate(&self, api_key: &str) -> CortexResult<Tenant> {
        let hash = hash_api_key(api_key);
        match self.tenants.find_by_api_key_hash(&hash).await? {
            Some(tenant) if constant_time_eq(&tenant.api_key_hash, &hash) => Ok(tenant),
            _ => Err(CortexError::Unauthenticated),
        }
    }
}
