use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dutyroster_auth::SessionError;
use dutyroster_core::DomainError;
use dutyroster_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ServiceError::Domain(DomainError::NotFound(msg)) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::Domain(DomainError::Conflict(msg)) => json_error(StatusCode::CONFLICT, "conflict", msg),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "data store failure");
            internal_error()
        }
    }
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    tracing::error!(error = %err, "session operation failed");
    internal_error()
}

pub fn not_found(message: impl Into<String>) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Generic 500. Details go to the log, never to the client.
pub fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
