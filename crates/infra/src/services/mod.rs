//! File-backed services for duty workers, duty types and duties.
//!
//! Each service owns one JSON file. Domain rules (validation, patching,
//! filtering) live in `dutyroster-duties`; services only add persistence and
//! cross-record checks.

pub mod duties;
pub mod duty_types;
pub mod duty_workers;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use dutyroster_core::DomainError;

use crate::json_store::{JsonFileStore, StoreError};

pub use duties::DutyService;
pub use duty_types::DutyTypeService;
pub use duty_workers::DutyWorkerService;

pub const DUTIES_FILE: &str = "duties.json";
pub const DUTY_TYPES_FILE: &str = "dutyTypes.json";
pub const DUTY_WORKERS_FILE: &str = "dutyWorkers.json";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// All duty services over one data directory.
#[derive(Debug, Clone)]
pub struct DutyServices {
    pub duties: Arc<DutyService>,
    pub duty_types: Arc<DutyTypeService>,
    pub duty_workers: Arc<DutyWorkerService>,
}

impl DutyServices {
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let duty_types = Arc::new(DutyTypeService::new(JsonFileStore::new(
            data_dir.join(DUTY_TYPES_FILE),
        )));
        let duty_workers = Arc::new(DutyWorkerService::new(JsonFileStore::new(
            data_dir.join(DUTY_WORKERS_FILE),
        )));
        let duties = Arc::new(DutyService::new(
            JsonFileStore::new(data_dir.join(DUTIES_FILE)),
            duty_types.clone(),
            duty_workers.clone(),
        ));

        Self {
            duties,
            duty_types,
            duty_workers,
        }
    }
}
