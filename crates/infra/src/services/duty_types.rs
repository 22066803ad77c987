use dutyroster_duties::{DutyType, DutyTypeFilter, DutyTypePatch, NewDutyType};

use super::ServiceResult;
use crate::json_store::{Change, JsonFileStore};

#[derive(Debug)]
pub struct DutyTypeService {
    store: JsonFileStore<DutyType>,
}

impl DutyTypeService {
    pub fn new(store: JsonFileStore<DutyType>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &DutyTypeFilter) -> ServiceResult<Vec<DutyType>> {
        Ok(filter.apply(self.store.load().await?))
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Option<DutyType>> {
        let types = self.store.load().await?;
        Ok(types.into_iter().find(|t| t.id == *id))
    }

    pub async fn create(&self, input: NewDutyType) -> ServiceResult<DutyType> {
        let duty_type = input.validate()?;
        let created = self
            .store
            .update(|types| {
                types.push(duty_type.clone());
                Change::Write(duty_type)
            })
            .await?;

        tracing::info!(duty_type_id = %created.id, "duty type created");
        Ok(created)
    }

    pub async fn update(&self, id: &str, patch: DutyTypePatch) -> ServiceResult<Option<DutyType>> {
        let updated = self
            .store
            .update(|types| match types.iter_mut().find(|t| t.id == *id) {
                Some(duty_type) => {
                    duty_type.apply(patch);
                    Change::Write(Some(duty_type.clone()))
                }
                None => Change::Keep(None),
            })
            .await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        let removed = self
            .store
            .update(|types| {
                let before = types.len();
                types.retain(|t| t.id != *id);
                if types.len() < before {
                    Change::Write(true)
                } else {
                    Change::Keep(false)
                }
            })
            .await?;
        if removed {
            tracing::info!(duty_type_id = %id, "duty type deleted");
        }
        Ok(removed)
    }
}
