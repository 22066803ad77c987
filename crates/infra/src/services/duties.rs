use std::sync::Arc;

use dutyroster_core::DomainError;
use dutyroster_duties::{Duty, DutyFilter, DutyPatch, DutyType, DutyWorker, NewDuty};

use super::{DutyTypeService, DutyWorkerService, ServiceResult};
use crate::json_store::{Change, JsonFileStore};

/// Duties reference duty types and workers by id on input and embed
/// snapshots of them on output, so this service resolves ids through the
/// other two services.
#[derive(Debug)]
pub struct DutyService {
    store: JsonFileStore<Duty>,
    duty_types: Arc<DutyTypeService>,
    duty_workers: Arc<DutyWorkerService>,
}

impl DutyService {
    pub fn new(
        store: JsonFileStore<Duty>,
        duty_types: Arc<DutyTypeService>,
        duty_workers: Arc<DutyWorkerService>,
    ) -> Self {
        Self {
            store,
            duty_types,
            duty_workers,
        }
    }

    pub async fn list(&self, filter: &DutyFilter) -> ServiceResult<Vec<Duty>> {
        Ok(filter.apply(self.store.load().await?))
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Option<Duty>> {
        let duties = self.store.load().await?;
        Ok(duties.into_iter().find(|d| d.id == *id))
    }

    pub async fn create(&self, input: NewDuty) -> ServiceResult<Duty> {
        let (date, type_id, worker_id) = input.validate()?;

        let duty_type = self.resolve_type(type_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("DutyType with ID {type_id} not found."))
        })?;
        let duty_worker = self.resolve_worker(worker_id).await?.ok_or_else(|| {
            DomainError::not_found(format!("DutyWorker with ID {worker_id} not found."))
        })?;

        let duty = Duty::new(date, duty_type, duty_worker);
        let created = self
            .store
            .update(|duties| {
                duties.push(duty.clone());
                Change::Write(duty)
            })
            .await?;

        tracing::info!(duty_id = %created.id, date = %created.date, "duty created");
        Ok(created)
    }

    /// Partial update. A `dutyTypeId`/`dutyWorkerId` that resolves to nothing
    /// leaves the embedded record unchanged.
    pub async fn update(&self, id: &str, patch: DutyPatch) -> ServiceResult<Option<Duty>> {
        let duty_type = match patch.duty_type_id() {
            Some(type_id) => self.resolve_type(type_id).await?,
            None => None,
        };
        let duty_worker = match patch.duty_worker_id() {
            Some(worker_id) => self.resolve_worker(worker_id).await?,
            None => None,
        };

        let updated = self
            .store
            .update(|duties| match duties.iter_mut().find(|d| d.id == *id) {
                Some(duty) => {
                    duty.apply(patch.date(), duty_type, duty_worker);
                    Change::Write(Some(duty.clone()))
                }
                None => Change::Keep(None),
            })
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let removed = self
            .store
            .update(|duties| {
                let before = duties.len();
                duties.retain(|d| d.id != *id);
                if duties.len() < before {
                    Change::Write(true)
                } else {
                    Change::Keep(false)
                }
            })
            .await?;
        if removed {
            tracing::info!(duty_id = %id, "duty deleted");
        }
        Ok(removed)
    }

    async fn resolve_type(&self, id: &str) -> ServiceResult<Option<DutyType>> {
        self.duty_types.get(id).await
    }

    async fn resolve_worker(&self, id: &str) -> ServiceResult<Option<DutyWorker>> {
        self.duty_workers.get(id).await
    }
}
