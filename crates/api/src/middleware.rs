use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use dutyroster_auth::{AuthorizationDecision, AuthorizationGate};

use crate::app::errors;
use crate::context::AuthContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: AuthorizationGate,
}

/// Authenticate the request and attach an [`AuthContext`].
///
/// Permission checks happen per route (see `crate::authz::RequirePermission`).
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let authorization = authorization_header(req.headers()).map(str::to_owned);
    let decision = state.gate.authenticate(authorization.as_deref()).await;

    match decision {
        Ok(AuthorizationDecision::Authorized(user)) => {
            req.extensions_mut().insert(AuthContext::new(user));
            next.run(req).await
        }
        Ok(_) => unauthenticated(),
        Err(e) => {
            tracing::error!(error = %e, "authorization gate failed");
            errors::internal_error()
        }
    }
}

pub fn unauthenticated() -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "not authenticated")
}

/// Raw `Authorization` header value, if present and valid UTF-8.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}
