use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use dutyroster_auth::{LoginOutcome, RefreshOutcome};

use crate::app::extract::ApiJson;
use crate::app::{dto, errors, AppServices};
use crate::context::AuthContext;
use crate::middleware;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ApiJson(body): ApiJson<dto::LoginRequest>,
) -> axum::response::Response {
    let Some((id, password)) = body.credentials() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "id and password are required",
        );
    };

    match services.sessions.login(id, password).await {
        Ok(LoginOutcome::Issued(token)) => (StatusCode::OK, Json(dto::TokenResponse { token })).into_response(),
        Ok(LoginOutcome::InvalidCredentials) => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        ),
        Err(e) => errors::session_error_to_response(e),
    }
}

/// Exchange a still-valid token for a fresh one with current permissions.
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    match services
        .sessions
        .refresh(middleware::authorization_header(&headers))
        .await
    {
        Ok(RefreshOutcome::Issued(token)) => (StatusCode::OK, Json(dto::TokenResponse { token })).into_response(),
        Ok(RefreshOutcome::Unauthenticated) => middleware::unauthenticated(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn me(Extension(ctx): Extension<AuthContext>) -> axum::response::Response {
    (StatusCode::OK, Json(ctx.user().clone())).into_response()
}
