use dutyroster_core::DomainError;
use dutyroster_duties::{DutyWorker, DutyWorkerFilter, DutyWorkerPatch, NewDutyWorker};

use super::ServiceResult;
use crate::json_store::{Change, JsonFileStore};

#[derive(Debug)]
pub struct DutyWorkerService {
    store: JsonFileStore<DutyWorker>,
}

impl DutyWorkerService {
    pub fn new(store: JsonFileStore<DutyWorker>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &DutyWorkerFilter) -> ServiceResult<Vec<DutyWorker>> {
        Ok(filter.apply(self.store.load().await?))
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Option<DutyWorker>> {
        let workers = self.store.load().await?;
        Ok(workers.into_iter().find(|w| w.id == *id))
    }

    /// Create a worker under its client-chosen id.
    pub async fn create(&self, input: NewDutyWorker) -> ServiceResult<DutyWorker> {
        let worker = input.validate()?;
        let created = self
            .store
            .update(|workers| {
                if workers.iter().any(|w| w.id == worker.id) {
                    return Change::Keep(Err(DomainError::conflict(format!(
                        "DutyWorker with ID {} already exists.",
                        worker.id
                    ))));
                }
                workers.push(worker.clone());
                Change::Write(Ok(worker))
            })
            .await??;

        tracing::info!(worker_id = %created.id, "duty worker created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: DutyWorkerPatch) -> ServiceResult<Option<DutyWorker>> {
        let updated = self
            .store
            .update(|workers| match workers.iter_mut().find(|w| w.id == *id) {
                Some(worker) => {
                    worker.apply(patch);
                    Change::Write(Some(worker.clone()))
                }
                None => Change::Keep(None),
            })
            .await?;
        Ok(updated)
    }

    /// Returns `false` if nothing had that id.
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let removed = self
            .store
            .update(|workers| {
                let before = workers.len();
                workers.retain(|w| w.id != *id);
                if workers.len() < before {
                    Change::Write(true)
                } else {
                    Change::Keep(false)
                }
            })
            .await?;
        if removed {
            tracing::info!(worker_id = %id, "duty worker deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;

    fn service(dir: &tempfile::TempDir) -> DutyWorkerService {
        DutyWorkerService::new(JsonFileStore::new(dir.path().join("dutyWorkers.json")))
    }

    fn new_worker(id: &str, name: &str) -> NewDutyWorker {
        NewDutyWorker {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    #[tokio::test]
    async fn crud_round() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);

        let created = svc.create(new_worker("w1", "Kuba")).await.unwrap();
        assert_eq!(created.id.as_str(), "w1");
        assert_eq!(svc.get("w1").await.unwrap(), Some(created));

        let updated = svc
            .update(
                "w1",
                DutyWorkerPatch {
                    name: Some("Jakub".into()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Jakub");

        assert!(svc.delete("w1").await.unwrap());
        assert!(!svc.delete("w1").await.unwrap());
        assert_eq!(svc.get("w1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        svc.create(new_worker("w1", "Kuba")).await.unwrap();

        let err = svc.create(new_worker("w1", "Ola")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
        assert_eq!(svc.list(&DutyWorkerFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        assert_eq!(svc.update("nope", DutyWorkerPatch::default()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_input_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir);
        let err = svc.create(NewDutyWorker::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert!(!dir.path().join("dutyWorkers.json").exists());
    }
}
