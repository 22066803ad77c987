//! Signed bearer tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::{Permission, TokenClaims};

/// Default token lifetime in seconds (one day).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// No signing secret was configured. Server fault, never a client error.
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies tokens with a secret injected at construction.
///
/// A missing secret is not a startup error: every issue/verify call reports
/// `MissingSecret` instead, so the misconfiguration surfaces per request.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Option<String>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: Option<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            ttl,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }

    fn secret(&self) -> Result<&[u8], TokenError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or(TokenError::MissingSecret)
    }

    /// Issue a token for `id` carrying a snapshot of `permissions`.
    pub fn issue(&self, id: &str, permissions: &[Permission]) -> Result<String, TokenError> {
        self.issue_at(id, permissions, Utc::now())
    }

    pub fn issue_at(
        &self,
        id: &str,
        permissions: &[Permission],
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let secret = self.secret()?;
        let claims = TokenClaims::new(id, permissions.to_vec(), now, self.ttl);

        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let secret = self.secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<TokenClaims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl core::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ttl() -> Duration {
        Duration::seconds(DEFAULT_TOKEN_TTL_SECS)
    }

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(Some(secret.to_string()), default_ttl())
    }

    #[test]
    fn issued_token_verifies_and_carries_claims() {
        let tokens = issuer("test-secret");
        let perms = vec![Permission::from_static("duties.view")];
        let token = tokens.issue("u1", &perms).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, "u1");
        assert_eq!(claims.permissions, perms);
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer("test-secret");
        let token = tokens
            .issue_at("u1", &[], Utc::now() - Duration::days(2))
            .unwrap();
        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = issuer("other-secret").issue("u1", &[]).unwrap();
        assert!(matches!(issuer("test-secret").verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(issuer("test-secret").verify("not.a.jwt"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn missing_secret_is_reported_on_every_call() {
        let tokens = TokenIssuer::new(None, default_ttl());
        assert!(!tokens.has_secret());
        assert_eq!(tokens.issue("u1", &[]), Err(TokenError::MissingSecret));
        assert_eq!(tokens.verify("x.y.z"), Err(TokenError::MissingSecret));

        let empty = TokenIssuer::new(Some(String::new()), default_ttl());
        assert_eq!(empty.issue("u1", &[]), Err(TokenError::MissingSecret));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", issuer("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
