//! `dutyroster-auth`: authentication/authorization boundary.
//!
//! This crate is decoupled from HTTP and storage: credential lookup is a
//! trait, and the gate consumes a raw `Authorization` header value.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod permissions;
pub mod session;
pub mod tokens;
pub mod user;

pub use authorize::{authorize, bearer_token, AuthorizationDecision, AuthorizationGate, GateError};
pub use claims::TokenClaims;
pub use password::{hash_password, verify_password, PasswordError, DEFAULT_PASSWORD_COST, PASSWORD_COST_RANGE};
pub use permissions::{has_permission, Permission, PermissionError};
pub use session::{LoginOutcome, RefreshOutcome, SessionError, SessionService};
pub use tokens::{TokenError, TokenIssuer};
pub use user::{AuthenticatedUser, CredentialStore, CredentialStoreError, User};
