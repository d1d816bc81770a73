//! Session configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

use crate::net::backend::BackendKind;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TOKEN_FILE: &str = ".session/token.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Views the session layer redirects to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Routes {
    /// Landing view after login or token-issuing signup.
    pub authenticated_home: String,
    /// Public landing view after logout.
    pub public_home: String,
    /// Sign-in view used by route guards.
    pub sign_in: String,
    /// Code-entry view after signup on verifying backends.
    pub verify_email: String,
    /// Reset-code entry view after a reset request.
    pub reset_password: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            authenticated_home: "/dashboard".to_owned(),
            public_home: "/".to_owned(),
            sign_in: "/auth/signin".to_owned(),
            verify_email: "/auth/verify-email".to_owned(),
            reset_password: "/auth/reset-password".to_owned(),
        }
    }
}

impl Routes {
    /// `verify_email` route carrying the address to confirm.
    #[must_use]
    pub fn verify_email_for(&self, email: &str) -> String {
        format!("{}?email={}", self.verify_email, urlencoding::encode(email))
    }

    /// `reset_password` route carrying the address being reset.
    #[must_use]
    pub fn reset_password_for(&self, email: &str) -> String {
        format!("{}?email={}", self.reset_password, urlencoding::encode(email))
    }

    /// Sign-in route flagged as reached right after email verification.
    #[must_use]
    pub fn sign_in_verified(&self) -> String {
        format!("{}?verified=true", self.sign_in)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub backend: BackendKind,
    pub api_url: String,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    pub token_file: PathBuf,
    pub routes: Routes,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Mock,
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout: None,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            routes: Routes::default(),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_BACKEND`: `mock` (default) or `account`
    /// - `AUTH_API_URL`: backend base URL, default `http://127.0.0.1:3000`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: unset means no timeout at this layer
    /// - `AUTH_TOKEN_FILE`: default `.session/token.json`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("AUTH_BACKEND") {
            config.backend =
                BackendKind::parse(&raw).ok_or(ConfigError::InvalidValue { var: "AUTH_BACKEND", value: raw })?;
        }
        if let Some(raw) = lookup("AUTH_API_URL").filter(|v| !v.trim().is_empty()) {
            config.api_url = raw.trim().trim_end_matches('/').to_owned();
        }
        if let Some(raw) = lookup("AUTH_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue { var: "AUTH_REQUEST_TIMEOUT_SECS", value: raw })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup("AUTH_TOKEN_FILE").filter(|v| !v.trim().is_empty()) {
            config.token_file = PathBuf::from(raw);
        }

        Ok(config)
    }
}
