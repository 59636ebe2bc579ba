//! Maps `CortexError` onto the HTTP status table in §7. `CortexError` and
//! `IntoResponse` are both foreign to this crate, so `ApiError` is the local
//! newtype the orphan rule requires.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use cortex_core::errors::{CortexError, StorageError};

pub struct ApiError(pub CortexError);

impl From<CortexError> for ApiError {
    fn from(err: CortexError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

fn storage_status(err: &StorageError) -> (StatusCode, &'static str) {
    match err {
        StorageError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        StorageError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
        StorageError::Unavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_UNAVAILABLE"),
        StorageError::Operation { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            CortexError::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            CortexError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            CortexError::MemoryNotFound { .. } => (StatusCode::NOT_FOUND, "MEMORY_NOT_FOUND"),
            CortexError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            CortexError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            CortexError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            CortexError::DeadlineExceeded => (StatusCode::GATEWAY_TIMEOUT, "DEADLINE_EXCEEDED"),
            CortexError::DependencyUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_UNAVAILABLE")
            }
            CortexError::StorageError(e) => storage_status(e),
            CortexError::EmbeddingError(_) => (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_UNAVAILABLE"),
            CortexError::ReasonerError(_) => (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_UNAVAILABLE"),
            CortexError::GraphError(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            CortexError::ConsolidationError(_) => (StatusCode::CONFLICT, "CONFLICT"),
            CortexError::DecayError(_) => (StatusCode::CONFLICT, "CONFLICT"),
            CortexError::SerializationError(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            CortexError::ConcurrencyError(_) => (StatusCode::CONFLICT, "CONFLICT"),
            CortexError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        };

        if status.is_server_error() {
            tracing::warn!(error = %self.0, code, "request failed");
        }

        (status, Json(ErrorBody { error: self.0.to_string(), code })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
