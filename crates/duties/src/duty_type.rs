use serde::{Deserialize, Serialize};

use dutyroster_core::{DomainError, DomainResult, RecordId};

use crate::{natural_cmp, present};

/// A kind of duty: what it is, when it starts (`HH:MM`) and optionally where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyType {
    pub id: RecordId,
    pub name: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDutyType {
    pub name: Option<String>,
    pub time: Option<String>,
    pub address: Option<String>,
}

impl NewDutyType {
    /// Validate and assign a fresh id.
    pub fn validate(&self) -> DomainResult<DutyType> {
        match (present(&self.name), present(&self.time)) {
            (Some(name), Some(time)) => Ok(DutyType {
                id: RecordId::generate(),
                name: name.to_string(),
                time: time.to_string(),
                address: present(&self.address).map(str::to_string),
            }),
            _ => Err(DomainError::validation("All fields (name, time) are required.")),
        }
    }
}

/// Partial update. The id is never changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DutyTypePatch {
    pub name: Option<String>,
    pub time: Option<String>,
    pub address: Option<String>,
}

impl DutyType {
    pub fn apply(&mut self, patch: DutyTypePatch) {
        if let Some(name) = present(&patch.name) {
            self.name = name.to_string();
        }
        if let Some(time) = present(&patch.time) {
            self.time = time.to_string();
        }
        if let Some(address) = present(&patch.address) {
            self.address = Some(address.to_string());
        }
    }
}

/// List filter. `name` and `address` compare case-insensitively, `time`
/// exactly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DutyTypeFilter {
    pub name: Option<String>,
    pub time: Option<String>,
    pub address: Option<String>,
}

impl DutyTypeFilter {
    pub fn matches(&self, duty_type: &DutyType) -> bool {
        present(&self.name).is_none_or(|name| duty_type.name.to_lowercase() == name.to_lowercase())
            && present(&self.time).is_none_or(|time| duty_type.time == time)
            && present(&self.address).is_none_or(|address| {
                duty_type
                    .address
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase() == address.to_lowercase())
            })
    }

    /// Filter and order by name, then time.
    pub fn apply(&self, types: Vec<DutyType>) -> Vec<DutyType> {
        let mut out: Vec<DutyType> = types.into_iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| natural_cmp(&a.name, &b.name).then_with(|| a.time.cmp(&b.time)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duty_type(id: &str, name: &str, time: &str, address: Option<&str>) -> DutyType {
        DutyType {
            id: RecordId::new(id),
            name: name.to_string(),
            time: time.to_string(),
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn create_requires_name_and_time() {
        let created = NewDutyType {
            name: Some("Fischer".into()),
            time: Some("16:00".into()),
            address: None,
        }
        .validate()
        .unwrap();
        assert_eq!(created.name, "Fischer");
        assert_eq!(created.time, "16:00");
        assert!(!created.id.as_str().is_empty());

        let err = NewDutyType {
            name: Some("Fischer".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, DomainError::validation("All fields (name, time) are required."));
    }

    #[test]
    fn patch_updates_given_fields_only() {
        let mut t = duty_type("t1", "Fischer", "16:00", Some("Hall A"));
        t.apply(DutyTypePatch {
            time: Some("16:30".into()),
            ..Default::default()
        });
        assert_eq!(t, duty_type("t1", "Fischer", "16:30", Some("Hall A")));
    }

    #[test]
    fn filters_combine() {
        let all = vec![
            duty_type("1", "Fischer", "16:00", Some("Hall A")),
            duty_type("2", "fischer", "18:00", Some("hall b")),
            duty_type("3", "Cleanup", "16:00", None),
        ];

        let by_name = DutyTypeFilter {
            name: Some("FISCHER".into()),
            ..Default::default()
        }
        .apply(all.clone());
        assert_eq!(by_name.len(), 2);

        let by_time = DutyTypeFilter {
            time: Some("16:00".into()),
            ..Default::default()
        }
        .apply(all.clone());
        let ids: Vec<_> = by_time.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);

        let by_address = DutyTypeFilter {
            address: Some("HALL B".into()),
            ..Default::default()
        }
        .apply(all);
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].id.as_str(), "2");
    }

    #[test]
    fn address_is_omitted_when_absent() {
        let json = serde_json::to_value(duty_type("1", "Cleanup", "16:00", None)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "1", "name": "Cleanup", "time": "16:00" }));
    }
}
