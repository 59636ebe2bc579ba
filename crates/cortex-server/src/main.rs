//! Process entry point for the Cortex ingress adapter: loads config, wires
//! providers and the kernel, starts background schedulers, and serves the
//! HTTP API (§6).

mod auth;
mod error;
mod logging;
mod rate_limit;
mod routes;
mod state;

use std::sync::Arc;

use axum::middleware;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use cortex_core::config::CortexConfig;
use cortex_embeddings::build_embedding_provider;
use cortex_kernel::CortexKernel;
use cortex_reasoner::build_reasoner;
use cortex_storage::InMemoryStore;

use rate_limit::RateLimitLayer;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = match std::env::var("CORTEX_CONFIG_PATH") {
        Ok(path) => CortexConfig::from_file(path)?,
        Err(_) => CortexConfig::default(),
    };

    let store = Arc::new(InMemoryStore::new());
    let embeddings = build_embedding_provider(&config.embedding)?;
    let reasoner = build_reasoner(&config.reasoner)?;

    let kernel = CortexKernel::new(config.clone(), store, embeddings, reasoner);
    kernel.start_schedulers();

    let state = AppState { kernel: kernel.clone() };

    let app = routes::build_router()
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging::log_requests))
                .layer(RateLimitLayer::new(
                    config.server.rate_limit_rps,
                    config.server.rate_limit_burst,
                    kernel.metrics().clone(),
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address.as_str()).await?;
    tracing::info!(bind_address = %config.server.bind_address, "cortex-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(kernel.clone()))
        .await?;

    Ok(())
}

async fn shutdown_signal(kernel: Arc<CortexKernel>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down, draining background schedulers");
    kernel.shutdown().await;
}
