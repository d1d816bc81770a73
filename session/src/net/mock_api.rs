//! Adapter for the bundled mock API (`/api/auth/login`, `/api/profile`).

use std::time::Duration;

use super::backend::AuthBackend;
use super::error::AuthError;
use super::http::ApiClient;
use super::types::{AuthSession, Credentials, MockAuthTokens, MockSignupRequest, MockUser, SignupData, SignupOutcome, User};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const PROFILE_PATH: &str = "/api/profile";

/// Speaks the mock dialect: bearer tokens and `{error, message}` error bodies.
#[derive(Clone, Debug)]
pub struct MockApiBackend {
    api: ApiClient,
}

impl MockApiBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AuthError> {
        Ok(Self { api: ApiClient::new(base_url, timeout)? })
    }
}

#[async_trait::async_trait]
impl AuthBackend for MockApiBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let req = self.api.post(LOGIN_PATH).json(credentials);
        let tokens: MockAuthTokens = self.api.send(req, "Login failed").await?;
        Ok(AuthSession { token: tokens.token, user: tokens.user.into() })
    }

    async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let body = MockSignupRequest { email: &data.email, password: &data.password, name: &data.name };
        let req = self.api.post(SIGNUP_PATH).json(&body);
        let tokens: MockAuthTokens = self.api.send(req, "Signup failed").await?;
        Ok(SignupOutcome::Authenticated(AuthSession { token: tokens.token, user: tokens.user.into() }))
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, AuthError> {
        let req = self.api.get(PROFILE_PATH).bearer_auth(token);
        let user: MockUser = self.api.send(req, "Profile request failed").await?;
        Ok(user.into())
    }
}
