//! Bearer API-key authentication (§6 "Authentication"). Grounded on the
//! ingress demo's `AuthMiddleware` shape, reworked as an axum extractor
//! rather than a tower `Transform` since axum resolves per-handler state
//! through `FromRequestParts` instead of request extensions alone.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use cortex_core::errors::CortexError;
use cortex_core::models::Tenant;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, injected as an extractor argument on every
/// route but the bootstrap `POST /v1/tenants` (§6 "required by every
/// non-bootstrap endpoint").
pub struct AuthenticatedTenant(pub Tenant);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError(CortexError::Unauthenticated))?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError(CortexError::Unauthenticated))?;

        let tenant = state.kernel.authenticate(token).await?;
        Ok(AuthenticatedTenant(tenant))
    }
}
