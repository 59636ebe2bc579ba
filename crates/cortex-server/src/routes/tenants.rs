//! `POST /v1/tenants` — the one unauthenticated bootstrap endpoint (§6).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use cortex_core::models::Tenant;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct CreateTenantResponse {
    pub tenant: Tenant,
    pub api_key: String,
}

pub async fn create_tenant(
    State(state): State<AppState>,
    Json(body): Json<CreateTenantRequest>,
) -> ApiResult<Json<CreateTenantResponse>> {
    let result = state.kernel.create_tenant(body.name).await?;
    Ok(Json(CreateTenantResponse { tenant: result.tenant, api_key: result.api_key }))
}
