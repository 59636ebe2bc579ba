//! Token-bucket rate limiting (§6 `rate_limit_rps`/`rate_limit_burst`).
//! `tower`'s built-in `RateLimit` is a fixed-window limiter, not a bucket,
//! so this is hand-rolled as a `tower::Layer`/`Service` pair — the same
//! shape the ingress demo's actix `Transform`/`Service` middleware takes,
//! translated to tower's equivalent traits.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use tower::{Layer, Service};

use cortex_core::errors::CortexError;
use cortex_core::observability::Metrics;

use crate::error::ApiError;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

struct Limiter {
    rps: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
    metrics: Arc<Metrics>,
}

impl Limiter {
    fn try_acquire(&self) -> bool {
        let mut bucket = self.bucket.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rps).min(self.burst);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            self.metrics.rate_limited_requests.incr();
            false
        }
    }
}

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<Limiter>,
}

impl RateLimitLayer {
    pub fn new(rps: u32, burst: u32, metrics: Arc<Metrics>) -> Self {
        Self {
            limiter: Arc::new(Limiter {
                rps: rps.max(1) as f64,
                burst: burst.max(1) as f64,
                bucket: Mutex::new(Bucket { tokens: burst.max(1) as f64, last_refill: Instant::now() }),
                metrics,
            }),
        }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService { inner, limiter: self.limiter.clone() }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<Limiter>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        if !self.limiter.try_acquire() {
            return Box::pin(async move { Ok(ApiError(CortexError::RateLimited).into_response()) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(req).await })
    }
}
