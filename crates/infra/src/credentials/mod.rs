//! Credential stores backing `dutyroster_auth::CredentialStore`.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
