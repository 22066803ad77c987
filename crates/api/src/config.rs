//! Process configuration from environment variables.

use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use dutyroster_auth::tokens::DEFAULT_TOKEN_TTL_SECS;
use dutyroster_auth::{DEFAULT_PASSWORD_COST, PASSWORD_COST_RANGE};
use dutyroster_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// HS256 signing secret. `None` is allowed at startup; auth routes then
    /// answer 500.
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    /// bcrypt work factor of the stored password hashes.
    pub password_cost: u32,
    pub data_dir: PathBuf,
    pub database_url: Option<String>,
    pub log_format: LogFormat,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("port", &self.port)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl", &self.token_ttl)
            .field("password_cost", &self.password_cost)
            .field("data_dir", &self.data_dir)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            jwt_secret: None,
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            password_cost: DEFAULT_PASSWORD_COST,
            data_dir: PathBuf::from("."),
            database_url: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("PORT", &raw, e.to_string()))?,
            None => defaults.port,
        };

        let token_ttl = match get("TOKEN_EXPIRE") {
            Some(raw) => parse_duration(&raw)
                .ok_or_else(|| ConfigError::invalid("TOKEN_EXPIRE", &raw, "expected seconds or <n>s/m/h/d/w"))?,
            None => defaults.token_ttl,
        };

        let password_cost = match get("BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| PASSWORD_COST_RANGE.contains(cost))
                .ok_or_else(|| ConfigError::invalid("BCRYPT_COST", &raw, "expected an integer from 4 to 31"))?,
            None => defaults.password_cost,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid("LOG_FORMAT", &raw, e.to_string()))?,
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            jwt_secret: get("JWT_SECRET"),
            token_ttl,
            password_cost,
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            database_url: get("DATABASE_URL"),
            log_format,
        })
    }
}

/// Parse a token lifetime: bare seconds (`"3600"`) or a number with a unit
/// suffix (`"30m"`, `"12h"`, `"1d"`, `"2w"`). Zero and negative values are
/// rejected.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);

    let n: i64 = digits.parse().ok()?;
    if n <= 0 {
        return None;
    }

    let per_unit = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return None,
    };

    Some(Duration::seconds(n.checked_mul(per_unit)?))
}
