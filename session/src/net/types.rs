//! Wire DTOs for both auth backend variants plus the unified session types.
//!
//! DESIGN
//! ======
//! Each backend speaks its own JSON dialect. Adapters deserialize into the
//! variant-specific structs below and convert into [`User`] / [`AuthSession`]
//! so the session context never sees which backend produced them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// SESSION TYPES
// =============================================================================

/// Email + password pair used for sign-in. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

/// Account creation input. `avatar` and `dob` are only sent to backends that
/// accept an extended profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
}

impl SignupData {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), password: password.into(), avatar: None, dob: None }
    }
}

/// The authenticated user as seen by the rest of the application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id. Backends without ids use the email.
    pub id: String,
    pub email: String,
    /// Display name (`name` or `fullname` depending on backend).
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// Build a user carrying only the core identity fields.
    #[must_use]
    pub fn basic(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            avatar: None,
            dob: None,
            is_verified: None,
            created_at: None,
        }
    }
}

/// Result of a successful credential exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Outcome of an account creation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The backend issued a token right away.
    Authenticated(AuthSession),
    /// The account exists but must be confirmed with an emailed code first.
    VerificationRequired {
        email: String,
        message: String,
        /// Present only when the backend echoes codes (test/demo servers).
        verification_code: Option<String>,
    },
}

/// Plain acknowledgement returned by verify and password-reset calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
    /// Echoed reset token from demo servers; real backends never send it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

// =============================================================================
// MOCK API VARIANT
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct MockSignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MockUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<MockUser> for User {
    fn from(value: MockUser) -> Self {
        User::basic(value.id, value.email, value.name)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MockAuthTokens {
    pub token: String,
    pub user: MockUser,
}

// =============================================================================
// ACCOUNT API VARIANT
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct AccountSignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub fullname: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountSignupResponse {
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub verification_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyEmailRequest<'a> {
    pub email: &'a str,
    pub verification_code: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SigninResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordResetRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordResetConfirmRequest<'a> {
    pub email: &'a str,
    pub reset_token: &'a str,
    pub new_password: &'a str,
}

/// Extended profile returned by the account variant's `me` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UserProfile {
    pub email: String,
    pub fullname: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl From<UserProfile> for User {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.email.clone(),
            email: value.email,
            name: value.fullname,
            avatar: value.avatar,
            dob: value.dob,
            is_verified: Some(value.is_verified),
            created_at: value.created_at,
        }
    }
}
