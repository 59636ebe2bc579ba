pub mod agents;
pub mod cognitive;
pub mod episodes;
pub mod feedback;
pub mod health;
pub mod memories;
pub mod procedures;
pub mod schemas;
pub mod tenants;
mod util;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// The full route table (§6 "EXTERNAL INTERFACES").
pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/metrics", get(health::metrics))
        .route("/v1/tenants", post(tenants::create_tenant))
        .route("/v1/agents", post(agents::create_agent))
        .route("/v1/agents/:id", get(agents::get_agent))
        .route(
            "/v1/agents/:id/policies",
            get(agents::get_policies).put(agents::put_policies),
        )
        .route("/v1/agents/:id/mind", get(agents::mind))
        .route("/v1/memories", post(memories::create_memory))
        .route("/v1/memories/recall", get(memories::recall))
        .route("/v1/memories/extract", post(memories::extract))
        .route(
            "/v1/memories/:id",
            get(memories::get_memory).delete(memories::delete_memory),
        )
        .route("/v1/episodes", post(episodes::encode_episode))
        .route("/v1/episodes/recall", get(episodes::recall_episodes))
        .route("/v1/episodes/:id", get(episodes::get_episode))
        .route("/v1/episodes/:id/outcome", post(episodes::record_outcome))
        .route("/v1/feedback", post(feedback::submit_feedback))
        .route("/v1/procedures/match", post(procedures::match_procedures))
        .route("/v1/procedures/learn", post(procedures::learn_procedure))
        .route("/v1/procedures/:id/outcome", post(procedures::record_outcome))
        .route("/v1/schemas", get(schemas::list_schemas))
        .route("/v1/schemas/match", post(schemas::match_schemas))
        .route("/v1/schemas/detect", post(schemas::detect_schemas))
        .route("/v1/schemas/:id/contradict", post(schemas::contradict_schema))
        .route("/v1/schemas/:id/validate", post(schemas::validate_schema))
        .route("/v1/schemas/:id", axum::routing::delete(schemas::delete_schema))
        .route("/v1/cognitive/activate", post(cognitive::activate))
        .route("/v1/cognitive/session", get(cognitive::get_session))
        .route("/v1/cognitive/goal", post(cognitive::set_goal))
        .route("/v1/cognitive/decay", post(cognitive::run_decay))
        .route("/v1/cognitive/consolidate", post(cognitive::consolidate))
        .route("/v1/cognitive/health", get(health::cognitive_health))
        .route("/v1/cognitive/reflect", get(cognitive::reflect))
        .route("/v1/cognitive/confidence/:memory_id", get(cognitive::explain_confidence))
        .route("/v1/cognitive/uncertainty", get(cognitive::uncertainty))
}
