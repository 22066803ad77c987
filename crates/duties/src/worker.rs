use serde::{Deserialize, Serialize};

use dutyroster_core::{DomainError, DomainResult, RecordId};

use crate::{natural_cmp, present};

/// A person who can be put on duty. The id is chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyWorker {
    pub id: RecordId,
    pub name: String,
}

/// Input for creating a worker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDutyWorker {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl NewDutyWorker {
    pub fn validate(&self) -> DomainResult<DutyWorker> {
        match (present(&self.id), present(&self.name)) {
            (Some(id), Some(name)) => Ok(DutyWorker {
                id: RecordId::new(id),
                name: name.to_string(),
            }),
            _ => Err(DomainError::validation("All fields (id, name) are required.")),
        }
    }
}

/// Partial update. The id is never changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DutyWorkerPatch {
    pub name: Option<String>,
}

impl DutyWorker {
    pub fn apply(&mut self, patch: DutyWorkerPatch) {
        if let Some(name) = present(&patch.name) {
            self.name = name.to_string();
        }
    }
}

/// List filter: exact `name` match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DutyWorkerFilter {
    pub name: Option<String>,
}

impl DutyWorkerFilter {
    pub fn matches(&self, worker: &DutyWorker) -> bool {
        present(&self.name).is_none_or(|name| worker.name == name)
    }

    /// Filter and order by name.
    pub fn apply(&self, workers: Vec<DutyWorker>) -> Vec<DutyWorker> {
        let mut out: Vec<DutyWorker> = workers.into_iter().filter(|w| self.matches(w)).collect();
        out.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(id: &str, name: &str) -> DutyWorker {
        DutyWorker {
            id: RecordId::new(id),
            name: name.to_string(),
        }
    }

    #[test]
    fn create_requires_id_and_name() {
        let ok = NewDutyWorker {
            id: Some("w1".into()),
            name: Some("Kuba".into()),
        };
        assert_eq!(ok.validate().unwrap(), worker("w1", "Kuba"));

        let missing_name = NewDutyWorker {
            id: Some("w1".into()),
            name: None,
        };
        assert!(matches!(missing_name.validate(), Err(DomainError::Validation(_))));

        let empty_id = NewDutyWorker {
            id: Some(String::new()),
            name: Some("Kuba".into()),
        };
        assert!(empty_id.validate().is_err());
    }

    #[test]
    fn patch_keeps_id() {
        let mut w = worker("w1", "Kuba");
        w.apply(DutyWorkerPatch {
            name: Some("Jakub".into()),
        });
        assert_eq!(w, worker("w1", "Jakub"));

        w.apply(DutyWorkerPatch::default());
        assert_eq!(w.name, "Jakub");
    }

    #[test]
    fn filter_is_exact_and_sorted_by_name() {
        let all = vec![worker("1", "Ola"), worker("2", "ania"), worker("3", "Kuba"), worker("4", "ola")];

        let sorted = DutyWorkerFilter::default().apply(all.clone());
        let names: Vec<_> = sorted.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["ania", "Kuba", "Ola", "ola"]);

        let only = DutyWorkerFilter {
            name: Some("Ola".into()),
        }
        .apply(all);
        assert_eq!(only, vec![worker("1", "Ola")]);
    }
}
