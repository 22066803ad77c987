use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::Permission;

/// Claims carried by a bearer token.
///
/// `permissions` is a snapshot taken at issuance; authorization always
/// re-reads the stored user, so the snapshot is informational for clients.
/// `iat`/`exp` are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id).
    pub id: String,

    pub permissions: Vec<Permission>,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(
        id: impl Into<String>,
        permissions: Vec<Permission>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            permissions,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_issue_time_plus_ttl() {
        let now = DateTime::from_timestamp(1_750_000_000, 0).unwrap();
        let claims = TokenClaims::new("u1", vec![], now, Duration::days(1));
        assert_eq!(claims.iat, 1_750_000_000);
        assert_eq!(claims.exp, 1_750_000_000 + 86_400);
        assert_eq!(claims.expires_at(), Some(now + Duration::days(1)));
    }

    #[test]
    fn wire_format_uses_plain_field_names() {
        let now = DateTime::from_timestamp(10, 0).unwrap();
        let claims = TokenClaims::new("u1", vec![Permission::from_static("duties.*")], now, Duration::seconds(5));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "u1", "permissions": ["duties.*"], "iat": 10, "exp": 15 })
        );
    }
}
