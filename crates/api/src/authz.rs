//! Per-route permission checks.
//!
//! Handlers take a [`RequirePermission`] as their first argument. It runs
//! before any body, query or path extractor, so a caller without the
//! permission gets 403 whatever they sent.

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Response,
};

use dutyroster_auth::{authorize, AuthorizationDecision, Permission};

use crate::app::errors;
use crate::context::AuthContext;
use crate::middleware;
use crate::permissions::RoutePermission;

/// Guard for a route declaring permission `P`.
pub struct RequirePermission<P>(PhantomData<fn() -> P>);

#[async_trait]
impl<S, P> FromRequestParts<S> for RequirePermission<P>
where
    S: Send + Sync,
    P: RoutePermission,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(ctx) = parts.extensions.get::<AuthContext>() else {
            return Err(middleware::unauthenticated());
        };
        require_permission(ctx, &P::PERMISSION)?;
        Ok(Self(PhantomData))
    }
}

pub fn require_permission(ctx: &AuthContext, required: &Permission) -> Result<(), Response> {
    match authorize(ctx.user(), required) {
        Ok(AuthorizationDecision::Authorized(_)) => Ok(()),
        Ok(_) => {
            tracing::debug!(user_id = %ctx.user_id(), required = %required, "permission denied");
            Err(errors::json_error(
                StatusCode::FORBIDDEN,
                "forbidden",
                "insufficient permissions",
            ))
        }
        Err(e) => {
            tracing::error!(permission = %required, error = %e, "invalid permission declaration");
            Err(errors::internal_error())
        }
    }
}
