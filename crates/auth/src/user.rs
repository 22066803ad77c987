//! User accounts as seen by authentication, and the credential lookup seam.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Permission;

/// A stored user account.
///
/// Field names follow the `users` table / seed file (`displayName`,
/// `password`). `password` holds a bcrypt hash, never plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub permissions: Vec<Permission>,
}

impl core::fmt::Debug for User {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("permissions", &self.permissions)
            .finish_non_exhaustive()
    }
}

/// An authenticated user resolved by the gate (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub display_name: String,
    pub permissions: Vec<Permission>,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            permissions: user.permissions,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt user record '{id}': {reason}")]
    Corrupt { id: String, reason: String },
}

/// Read access to user accounts.
///
/// Implementations must be safe to call concurrently and report "not found"
/// as `Ok(None)`, never as an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CredentialStoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CredentialStoreError> {
        (**self).find_user_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_format_round_trips_through_table_field_names() {
        let json = serde_json::json!({
            "id": "jkowalski",
            "displayName": "Jan Kowalski",
            "password": "$2b$04$abc",
            "permissions": ["duties.*"],
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.display_name, "Jan Kowalski");
        assert_eq!(user.password_hash, "$2b$04$abc");
        assert_eq!(user.permissions, vec![Permission::from_static("duties.*")]);
    }

    #[test]
    fn debug_output_omits_password_hash() {
        let user = User {
            id: "u1".into(),
            display_name: "U".into(),
            password_hash: "$2b$04$secret".into(),
            permissions: vec![],
        };
        assert!(!format!("{user:?}").contains("secret"));
    }

    #[test]
    fn authenticated_user_drops_hash() {
        let user = User {
            id: "u1".into(),
            display_name: "U".into(),
            password_hash: "h".into(),
            permissions: vec![Permission::from_static("a.b")],
        };
        let json = serde_json::to_value(AuthenticatedUser::from(user)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "u1", "displayName": "U", "permissions": ["a.b"] }));
    }
}
