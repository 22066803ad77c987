use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;

use dutyroster_auth::{CredentialStore, CredentialStoreError, User};

use crate::json_store::JsonFileStore;

/// In-memory user accounts keyed by id.
///
/// Intended for tests/dev, and as the fallback when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for user in users {
            store.upsert(user);
        }
        store
    }

    /// Load accounts from a JSON array of users (bcrypt hashes in `password`).
    ///
    /// Follows the same tolerance as the duty data files: a missing or
    /// unparseable file yields an empty store.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, CredentialStoreError> {
        let path = path.as_ref();
        let users = JsonFileStore::<User>::new(path)
            .load()
            .await
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        tracing::info!(path = %path.display(), users = users.len(), "seeded in-memory credential store");
        Ok(Self::with_users(users))
    }

    pub fn upsert(&self, user: User) {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.insert(user.id.clone(), user);
    }

    pub fn remove(&self, id: &str) -> Option<User> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        users.remove(id)
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CredentialStoreError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.get(id).cloned())
    }
}
