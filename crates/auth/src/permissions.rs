use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wildcard marker. A held permission ending in `*` grants every required
/// permission that starts with the text before it.
const WILDCARD: char = '*';

/// Permission identifier.
///
/// Permissions are strings of the form `scope.action` (e.g. "duties.edit").
/// Held permissions may end in `*` ("duties.*", or a lone "*") to grant a
/// whole prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Permission backed by a static string, usable in `const` route declarations.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str().ends_with(WILDCARD)
    }

    /// The prefix granted by a wildcard permission (`"duties.*"` -> `"duties."`).
    pub fn wildcard_prefix(&self) -> Option<&str> {
        self.as_str().strip_suffix(WILDCARD)
    }

    /// Check that this permission is usable as a *required* permission.
    pub fn validate_required(&self) -> Result<(), PermissionError> {
        if is_exact_permission(self.as_str()) {
            Ok(())
        } else {
            Err(PermissionError::InvalidFormat(self.as_str().to_string()))
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// The required permission is not `<alnum>*.<alnum>*`. This is a bug in a
    /// route declaration, never a client error.
    #[error("invalid permission format: {0}")]
    InvalidFormat(String),
}

/// `<alnum>*.<alnum>*` with ASCII alphanumerics and exactly one dot.
///
/// NOTE: both segments may be empty, so `"."` is accepted. This looks
/// unintended but is kept as-is until product decides otherwise.
fn is_exact_permission(s: &str) -> bool {
    match s.split_once('.') {
        Some((scope, action)) => [scope, action]
            .iter()
            .all(|segment| segment.chars().all(|c| c.is_ascii_alphanumeric())),
        None => false,
    }
}

/// Decide whether `held` satisfies `required`.
///
/// - `required` must be an exact permission, otherwise `InvalidFormat`.
/// - A held permission matches on string equality, or, when it ends in `*`,
///   when `required` starts with everything before the `*`.
///
/// The prefix match is plain string prefix, not segment-aware: "dutyTypes.*"
/// is satisfied by "dutyTypes.edit" but also by "dutyTypesExtra.edit".
///
/// Held permissions are not validated; nothing is trimmed or case-folded.
pub fn has_permission(held: &[Permission], required: &Permission) -> Result<bool, PermissionError> {
    required.validate_required()?;

    let required = required.as_str();
    Ok(held.iter().any(|perm| {
        perm.as_str() == required
            || perm
                .wildcard_prefix()
                .is_some_and(|prefix| required.starts_with(prefix))
    }))
}
