use serde::{Deserialize, Serialize};

use dutyroster_core::{DomainError, DomainResult, RecordId};

use crate::{present, DutyType, DutyWorker};

/// One assignment: a worker on a duty type on a date (`YYYY-MM-DD`).
///
/// The duty type and worker are embedded snapshots; later edits to either
/// record do not propagate into existing duties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Duty {
    pub id: RecordId,
    pub date: String,
    #[serde(rename = "type")]
    pub duty_type: DutyType,
    pub duty_worker: DutyWorker,
}

impl Duty {
    pub fn new(date: impl Into<String>, duty_type: DutyType, duty_worker: DutyWorker) -> Self {
        Self {
            id: RecordId::generate(),
            date: date.into(),
            duty_type,
            duty_worker,
        }
    }

    /// Apply already-resolved changes. `None` keeps the current value.
    pub fn apply(
        &mut self,
        date: Option<&str>,
        duty_type: Option<DutyType>,
        duty_worker: Option<DutyWorker>,
    ) {
        if let Some(date) = date {
            self.date = date.to_string();
        }
        if let Some(duty_type) = duty_type {
            self.duty_type = duty_type;
        }
        if let Some(duty_worker) = duty_worker {
            self.duty_worker = duty_worker;
        }
    }
}

/// Input for creating a duty: references by id, resolved by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDuty {
    pub date: Option<String>,
    pub duty_type_id: Option<String>,
    pub duty_worker_id: Option<String>,
}

/// Validated create request: `(date, duty_type_id, duty_worker_id)`.
pub type DutyRefs<'a> = (&'a str, &'a str, &'a str);

impl NewDuty {
    pub fn validate(&self) -> DomainResult<DutyRefs<'_>> {
        match (
            present(&self.date),
            present(&self.duty_type_id),
            present(&self.duty_worker_id),
        ) {
            (Some(date), Some(type_id), Some(worker_id)) => Ok((date, type_id, worker_id)),
            _ => Err(DomainError::validation(
                "All fields (date, dutyTypeId, dutyWorkerId) are required.",
            )),
        }
    }
}

/// Partial update by reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyPatch {
    pub date: Option<String>,
    pub duty_type_id: Option<String>,
    pub duty_worker_id: Option<String>,
}

impl DutyPatch {
    pub fn date(&self) -> Option<&str> {
        present(&self.date)
    }

    pub fn duty_type_id(&self) -> Option<&str> {
        present(&self.duty_type_id)
    }

    pub fn duty_worker_id(&self) -> Option<&str> {
        present(&self.duty_worker_id)
    }
}

/// List filter: exact `date`, and `dutyWorker` matching the worker's name
/// case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyFilter {
    pub date: Option<String>,
    pub duty_worker: Option<String>,
}

impl DutyFilter {
    pub fn matches(&self, duty: &Duty) -> bool {
        present(&self.date).is_none_or(|date| duty.date == date)
            && present(&self.duty_worker)
                .is_none_or(|name| duty.duty_worker.name.to_lowercase() == name.to_lowercase())
    }

    /// Filter and order chronologically (date, then duty type start time).
    pub fn apply(&self, duties: Vec<Duty>) -> Vec<Duty> {
        let mut out: Vec<Duty> = duties.into_iter().filter(|d| self.matches(d)).collect();
        out.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.duty_type.time.cmp(&b.duty_type.time))
        });
        out
    }
}
