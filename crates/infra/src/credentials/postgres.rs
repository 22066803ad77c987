//! Postgres-backed credential store.
//!
//! Reads the `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id           TEXT PRIMARY KEY,
//!     display_name TEXT NOT NULL,
//!     permissions  JSONB NOT NULL DEFAULT '[]',
//!     password     TEXT NOT NULL,
//!     created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
//!     updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```
//!
//! Account management happens outside this service; the store is read-only.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;

use dutyroster_auth::{CredentialStore, CredentialStoreError, Permission, User};

#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a small connection pool against `database_url`.
    ///
    /// Connection is lazy; an unreachable database surfaces as
    /// `Unavailable` on the first lookup.
    pub fn connect_lazy(database_url: &str) -> Result<Self, CredentialStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, CredentialStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, display_name, permissions, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_id", e))?;

        row.map(|row| user_from_row(id, &row)).transpose()
    }
}

fn user_from_row(id: &str, row: &PgRow) -> Result<User, CredentialStoreError> {
    let corrupt = |e: sqlx::Error| CredentialStoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    };

    let Json(permissions): Json<Vec<Permission>> = row.try_get("permissions").map_err(corrupt)?;
    Ok(User {
        id: row.try_get("id").map_err(corrupt)?,
        display_name: row.try_get("display_name").map_err(corrupt)?,
        password_hash: row.try_get("password").map_err(corrupt)?,
        permissions,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CredentialStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            CredentialStoreError::Unavailable(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            CredentialStoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        other => CredentialStoreError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}
