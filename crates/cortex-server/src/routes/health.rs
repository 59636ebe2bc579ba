//! `GET /health`, `GET /metrics` (liveness, unauthenticated) and
//! `GET /v1/cognitive/health` (authenticated kernel health snapshot) — §6.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use cortex_kernel::HealthSnapshot;

use crate::auth::AuthenticatedTenant;
use crate::state::AppState;

pub async fn liveness() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.kernel.metrics().render()
}

pub async fn cognitive_health(
    State(state): State<AppState>,
    AuthenticatedTenant(_tenant): AuthenticatedTenant,
) -> Json<HealthSnapshot> {
    Json(state.kernel.health())
}
