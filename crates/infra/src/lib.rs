//! Infrastructure layer: JSON file persistence for duty data and credential
//! stores for authentication.

pub mod credentials;
pub mod json_store;
pub mod services;

pub use credentials::{InMemoryCredentialStore, PostgresCredentialStore};
pub use json_store::{Change, JsonFileStore, StoreError};
pub use services::{DutyServices, DutyService, DutyTypeService, DutyWorkerService, ServiceError};
