//! Server configuration from environment variables.
//!
//! DESIGN
//! ======
//! `JWT_SECRET` has no default and startup fails without it. Every other
//! setting falls back to a default when unset, but a value that is set and
//! malformed is an error rather than silently ignored.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_JWT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set")]
    MissingSecret,
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Which wire dialect the server speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiVariant {
    /// `/api/auth/login`, `/api/auth/signup`, `/api/profile`; bearer tokens.
    Mock,
    /// Account service with email verification and password reset.
    Account,
}

impl ApiVariant {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mock" => Some(Self::Mock),
            "account" => Some(Self::Account),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Account => "account",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub variant: ApiVariant,
    pub port: u16,
    /// Include verification codes and reset tokens in API replies.
    pub echo_codes: bool,
}

impl ServerConfig {
    /// Config for tests and embedding: given secret, every other setting default.
    #[must_use]
    pub fn new(jwt_secret: impl Into<String>, variant: ApiVariant) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_ttl: Duration::from_secs(DEFAULT_JWT_TTL_SECS),
            variant,
            port: DEFAULT_PORT,
            echo_codes: false,
        }
    }

    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or a variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let variant = match lookup("MOCK_API_VARIANT") {
            Some(raw) => ApiVariant::parse(&raw).ok_or(ConfigError::InvalidValue { var: "MOCK_API_VARIANT", value: raw })?,
            None => ApiVariant::Mock,
        };

        let ttl_secs = env_parse(&lookup, "JWT_TTL_SECS", DEFAULT_JWT_TTL_SECS)?;
        let port = env_parse(&lookup, "PORT", DEFAULT_PORT)?;
        let echo_codes = match lookup("ECHO_CODES") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue { var: "ECHO_CODES", value: raw })?,
            None => false,
        };

        Ok(Self { jwt_secret, jwt_ttl: Duration::from_secs(ttl_secs), variant, port, echo_codes })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { var: key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
