//! Authorization gate: bearer token -> verified claims -> stored user ->
//! permission check.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    has_permission, AuthenticatedUser, CredentialStore, CredentialStoreError, Permission,
    PermissionError, TokenError, TokenIssuer,
};

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// No usable credentials: missing/malformed header, bad or expired token,
    /// or the token's user no longer exists.
    Unauthenticated,

    /// Authenticated, but the user lacks the declared permission.
    Forbidden { required: Permission },

    Authorized(AuthenticatedUser),
}

/// Server-side faults. None of these are the client's doing; callers map
/// them to a generic 500.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("authorization gate misconfigured: {0}")]
    Configuration(TokenError),

    #[error(transparent)]
    InvalidPermission(#[from] PermissionError),

    #[error(transparent)]
    CredentialStore(#[from] CredentialStoreError),
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// Anything else (other schemes, empty token, missing header) yields `None`.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

/// Permission stage: check an already-authenticated user.
///
/// - No IO
/// - No panics
/// - `InvalidPermission` means the route declaration itself is broken
pub fn authorize(
    user: &AuthenticatedUser,
    required: &Permission,
) -> Result<AuthorizationDecision, PermissionError> {
    if has_permission(&user.permissions, required)? {
        Ok(AuthorizationDecision::Authorized(user.clone()))
    } else {
        Ok(AuthorizationDecision::Forbidden {
            required: required.clone(),
        })
    }
}

/// Authentication + authorization for protected operations.
///
/// Holds no per-request state and performs no writes, so one instance is
/// shared by every request.
#[derive(Clone)]
pub struct AuthorizationGate {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenIssuer>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Authentication stage. Returns `Authorized(user)` with the user as
    /// currently stored, or `Unauthenticated`.
    pub async fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthorizationDecision, GateError> {
        let Some(token) = bearer_token(authorization) else {
            tracing::debug!("no bearer token");
            return Ok(AuthorizationDecision::Unauthenticated);
        };

        let claims = match self.tokens.verify(token) {
            Ok(claims) => claims,
            Err(TokenError::MissingSecret) => {
                return Err(GateError::Configuration(TokenError::MissingSecret));
            }
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                return Ok(AuthorizationDecision::Unauthenticated);
            }
        };

        match self.store.find_user_by_id(&claims.id).await? {
            Some(user) => Ok(AuthorizationDecision::Authorized(user.into())),
            None => {
                tracing::debug!(user_id = %claims.id, "token subject no longer exists");
                Ok(AuthorizationDecision::Unauthenticated)
            }
        }
    }

    /// Full decision: authenticate, then check `required` when the operation
    /// declares one. The matcher is never consulted for unauthenticated
    /// requests.
    pub async fn decide(
        &self,
        authorization: Option<&str>,
        required: Option<&Permission>,
    ) -> Result<AuthorizationDecision, GateError> {
        let user = match self.authenticate(authorization).await? {
            AuthorizationDecision::Authorized(user) => user,
            other => return Ok(other),
        };

        match required {
            Some(required) => Ok(authorize(&user, required)?),
            None => Ok(AuthorizationDecision::Authorized(user)),
        }
    }
}
