use axum::BoxError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockroom_core::DomainError;
use tracing::error;

/// Handler error: a domain error rendered as `{ "error", "message" }`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        domain_error_to_response(self.0)
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let (status, code) = match &err {
        DomainError::NameConflict { .. } => (StatusCode::CONFLICT, "name_conflict"),
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::InsufficientStock { .. } => (StatusCode::CONFLICT, "insufficient_stock"),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
        DomainError::InvariantViolation(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation")
        }
        DomainError::Store(_) => {
            error!(error = %err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, "store_error")
        }
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Error handler for the middleware stack; only the timeout layer can fail.
pub async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        return json_error(StatusCode::REQUEST_TIMEOUT, "timeout", "request timed out");
    }
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        err.to_string(),
    )
}
