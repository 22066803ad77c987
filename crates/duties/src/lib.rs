//! Duty scheduling domain: duty workers, duty types and the duties that
//! assign one to the other on a date.
//!
//! Pure domain logic (validation, patches, filtering, ordering). No IO, no
//! HTTP, no storage.

pub mod duty;
pub mod duty_type;
pub mod worker;

pub use duty::{Duty, DutyFilter, DutyPatch, NewDuty};
pub use duty_type::{DutyType, DutyTypeFilter, DutyTypePatch, NewDutyType};
pub use worker::{DutyWorker, DutyWorkerFilter, DutyWorkerPatch, NewDutyWorker};

use std::cmp::Ordering;

/// Treat empty strings like absent values (query strings and JSON bodies
/// commonly send `""` for "unset").
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Case-insensitive ordering with a case-sensitive tiebreak, so the result is
/// total and stable across runs.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
