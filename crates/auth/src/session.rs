//! Login and token refresh.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    hash_password, verify_password, AuthorizationDecision, AuthorizationGate, CredentialStoreError,
    GateError, PasswordError, TokenError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Issued(String),
    /// Unknown id or wrong password. Deliberately indistinguishable.
    InvalidCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Issued(String),
    Unauthenticated,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("password check task failed: {0}")]
    Worker(String),
}

impl From<CredentialStoreError> for SessionError {
    fn from(value: CredentialStoreError) -> Self {
        Self::Gate(GateError::CredentialStore(value))
    }
}

const DUMMY_PASSWORD: &str = "dutyroster-dummy-password";

/// Issues tokens at login and refresh.
#[derive(Clone)]
pub struct SessionService {
    gate: AuthorizationGate,
    /// Compared against when the id is unknown, so unknown ids cost the same
    /// bcrypt round as wrong passwords.
    dummy_hash: Arc<str>,
}

impl SessionService {
    /// `password_cost` must match the work factor of the stored hashes.
    pub fn new(gate: AuthorizationGate, password_cost: u32) -> Result<Self, PasswordError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, password_cost)?;
        Ok(Self {
            gate,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Check `id`/`password` and issue a token embedding the user's current
    /// permissions.
    ///
    /// Unknown ids, wrong passwords and unreadable stored hashes all give
    /// `InvalidCredentials`.
    pub async fn login(&self, id: &str, password: &str) -> Result<LoginOutcome, SessionError> {
        let user = self.gate.store().find_user_by_id(id).await?;

        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let password = password.to_owned();
        // bcrypt is CPU-bound; keep it off the async workers.
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| SessionError::Worker(e.to_string()))?;

        let matches = match verified {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(user_id = %id, error = %e, "stored password hash is unreadable");
                false
            }
        };

        match user {
            Some(user) if matches => {
                let token = self.gate.tokens().issue(&user.id, &user.permissions)?;
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(LoginOutcome::Issued(token))
            }
            _ => {
                tracing::info!("login rejected: invalid credentials");
                Ok(LoginOutcome::InvalidCredentials)
            }
        }
    }

    /// Re-verify a still-valid token and issue a fresh one carrying the
    /// user's *current* stored permissions.
    pub async fn refresh(&self, authorization: Option<&str>) -> Result<RefreshOutcome, SessionError> {
        match self.gate.authenticate(authorization).await? {
            AuthorizationDecision::Authorized(user) => {
                let token = self.gate.tokens().issue(&user.id, &user.permissions)?;
                tracing::debug!(user_id = %user.id, "token refreshed");
                Ok(RefreshOutcome::Issued(token))
            }
            _ => Ok(RefreshOutcome::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::{CredentialStore, Permission, TokenIssuer, User};

    const SECRET: &str = "test-secret";

    #[derive(Default)]
    struct TestStore {
        users: RwLock<HashMap<String, User>>,
    }

    impl TestStore {
        fn put(&self, user: User) {
            self.users.write().unwrap().insert(user.id.clone(), user);
        }
    }

    #[async_trait]
    impl CredentialStore for TestStore {
        async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CredentialStoreError> {
            Ok(self.users.read().unwrap().get(id).cloned())
        }
    }

    fn user(id: &str, password: &str, perms: &[&'static str]) -> User {
        User {
            id: id.to_string(),
            display_name: id.to_string(),
            password_hash: hash_password(password, 4).unwrap(),
            permissions: perms.iter().copied().map(Permission::from_static).collect(),
        }
    }

    fn service(secret: Option<&str>) -> (Arc<TestStore>, Arc<TokenIssuer>, SessionService) {
        let store = Arc::new(TestStore::default());
        let tokens = Arc::new(TokenIssuer::new(secret.map(str::to_string), Duration::hours(1)));
        let gate = AuthorizationGate::new(store.clone(), tokens.clone());
        (store, tokens, SessionService::new(gate, 4).unwrap())
    }

    #[tokio::test]
    async fn login_issues_token_with_permissions() {
        let (store, tokens, sessions) = service(Some(SECRET));
        store.put(user("u1", "pw", &["duties.*"]));

        let LoginOutcome::Issued(token) = sessions.login("u1", "pw").await.unwrap() else {
            panic!("expected token");
        };
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.id, "u1");
        assert_eq!(claims.permissions, vec![Permission::from_static("duties.*")]);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let (store, _tokens, sessions) = service(Some(SECRET));
        store.put(user("u1", "pw", &[]));

        let wrong = sessions.login("u1", "nope").await.unwrap();
        let unknown = sessions.login("ghost", "pw").await.unwrap();
        assert_eq!(wrong, LoginOutcome::InvalidCredentials);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn unreadable_stored_hash_is_rejected_like_an_unknown_user() {
        let (store, _tokens, sessions) = service(Some(SECRET));
        let mut broken = user("u1", "pw", &["duties.*"]);
        broken.password_hash = "pw".to_string();
        store.put(broken);

        let outcome = sessions.login("u1", "pw").await.unwrap();
        assert_eq!(outcome, LoginOutcome::InvalidCredentials);
        assert_eq!(outcome, sessions.login("ghost", "pw").await.unwrap());
    }

    #[tokio::test]
    async fn dummy_password_never_logs_in_an_unknown_id() {
        let (_store, _tokens, sessions) = service(Some(SECRET));
        assert_eq!(
            sessions.login("ghost", DUMMY_PASSWORD).await.unwrap(),
            LoginOutcome::InvalidCredentials
        );
    }

    #[test]
    fn invalid_cost_is_rejected_at_construction() {
        let store = Arc::new(TestStore::default());
        let tokens = Arc::new(TokenIssuer::new(Some(SECRET.to_string()), Duration::hours(1)));
        let gate = AuthorizationGate::new(store, tokens);
        assert!(SessionService::new(gate, 2).is_err());
    }

    #[tokio::test]
    async fn login_without_secret_is_a_server_fault() {
        let (store, _tokens, sessions) = service(None);
        store.put(user("u1", "pw", &[]));

        let err = sessions.login("u1", "pw").await.unwrap_err();
        assert!(matches!(err, SessionError::Token(TokenError::MissingSecret)));
    }

    #[tokio::test]
    async fn refresh_embeds_current_permissions() {
        let (store, tokens, sessions) = service(Some(SECRET));
        store.put(user("u1", "pw", &["duties.view"]));
        let old = tokens.issue("u1", &[Permission::from_static("duties.view")]).unwrap();

        // Permissions change after the original token was issued.
        store.put(user("u1", "pw", &["duties.view", "duties.edit"]));

        let RefreshOutcome::Issued(fresh) = sessions.refresh(Some(&format!("Bearer {old}"))).await.unwrap() else {
            panic!("expected refreshed token");
        };
        let claims = tokens.verify(&fresh).unwrap();
        assert_eq!(
            claims.permissions,
            vec![Permission::from_static("duties.view"), Permission::from_static("duties.edit")]
        );
    }

    #[tokio::test]
    async fn refresh_rejects_expired_and_missing_tokens() {
        let (store, tokens, sessions) = service(Some(SECRET));
        store.put(user("u1", "pw", &[]));
        let expired = tokens
            .issue_at("u1", &[], Utc::now() - Duration::hours(2))
            .unwrap();

        assert_eq!(
            sessions.refresh(Some(&format!("Bearer {expired}"))).await.unwrap(),
            RefreshOutcome::Unauthenticated
        );
        assert_eq!(sessions.refresh(None).await.unwrap(), RefreshOutcome::Unauthenticated);
    }

    #[tokio::test]
    async fn refresh_for_deleted_user_is_unauthenticated() {
        let (_store, tokens, sessions) = service(Some(SECRET));
        let token = tokens.issue("gone", &[]).unwrap();
        assert_eq!(
            sessions.refresh(Some(&format!("Bearer {token}"))).await.unwrap(),
            RefreshOutcome::Unauthenticated
        );
    }
}
