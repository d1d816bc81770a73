//! Backend adapter seam.
//!
//! DESIGN
//! ======
//! The session context talks to exactly one `AuthBackend`, picked by
//! configuration. Each adapter owns its wire dialect (routes, header
//! convention, error body shape) and returns the unified types from
//! [`super::types`]. Input validation happens before an adapter is called.

use std::sync::Arc;
use std::time::Duration;

use super::account_api::AccountApiBackend;
use super::error::AuthError;
use super::mock_api::MockApiBackend;
use super::types::{Ack, AuthSession, Credentials, SignupData, SignupOutcome, User};

/// Which backend dialect to speak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// `/api/auth/login` + `/api/profile`, `Authorization: Bearer`, `{error, message}` bodies.
    Mock,
    /// `/api/auth/signin` + `/api/auth/me`, `token` header, `{detail}` bodies.
    Account,
}

impl BackendKind {
    /// Parse a configuration value. Accepts `mock` and `account`, case-insensitively.
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

/// Credential exchange and profile lookup against one backend variant.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Short name used in logs and `Unsupported` errors.
    fn name(&self) -> &'static str;

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError>;

    async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError>;

    async fn verify_email(&self, email: &str, code: &str) -> Result<Ack, AuthError> {
        let _ = (email, code);
        Err(AuthError::Unsupported { operation: "email verification", backend: self.name() })
    }

    async fn request_password_reset(&self, email: &str) -> Result<Ack, AuthError> {
        let _ = email;
        Err(AuthError::Unsupported { operation: "password reset", backend: self.name() })
    }

    async fn confirm_password_reset(&self, email: &str, reset_token: &str, new_password: &str) -> Result<Ack, AuthError> {
        let _ = (email, reset_token, new_password);
        Err(AuthError::Unsupported { operation: "password reset", backend: self.name() })
    }

    /// Resolve the user that owns `token` ("whoami").
    async fn fetch_profile(&self, token: &str) -> Result<User, AuthError>;
}

/// Build the adapter for `kind` rooted at `base_url`.
///
/// # Errors
///
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn build_backend(kind: BackendKind, base_url: &str, timeout: Option<Duration>) -> Result<Arc<dyn AuthBackend>, AuthError> {
    let backend: Arc<dyn AuthBackend> = match kind {
        BackendKind::Mock => Arc::new(MockApiBackend::new(base_url, timeout)?),
        BackendKind::Account => Arc::new(AccountApiBackend::new(base_url, timeout)?),
    };
    tracing::debug!(backend = kind.as_str(), base_url, "auth backend configured");
    Ok(backend)
}
