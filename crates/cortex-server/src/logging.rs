//! Request logging (§9 ambient stack). Grounded on the ingress demo's
//! `LoggingMiddleware` field conventions (`method`, `path`, `status`,
//! `duration_ms`, warn above 400), rewritten as an axum `middleware::from_fn`
//! since axum has no `Transform`/`Service` wrapper boilerplate to imitate.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status >= 400 {
        warn!(%method, %path, status, duration_ms, "request completed with error");
    } else {
        info!(%method, %path, status, duration_ms, "request completed");
    }

    response
}
