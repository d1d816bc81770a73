//! Adapter for the account API (email verification, `token` header, `{detail}` errors).
//!
//! DESIGN
//! ======
//! `signin` returns only an access token, so `login` follows it with a `me`
//! call. The session therefore always starts from a profile the backend has
//! just confirmed, matching what the validator would produce on mount.

use std::time::Duration;

use super::backend::AuthBackend;
use super::error::AuthError;
use super::http::ApiClient;
use super::types::{
    AccountSignupRequest, AccountSignupResponse, Ack, AuthSession, Credentials, PasswordResetConfirmRequest,
    PasswordResetRequest, SigninResponse, SignupData, SignupOutcome, User, UserProfile, VerifyEmailRequest,
};

pub const SIGNUP_PATH: &str = "/api/auth/signup";
pub const VERIFY_EMAIL_PATH: &str = "/api/auth/verify-email";
pub const SIGNIN_PATH: &str = "/api/auth/signin";
pub const ME_PATH: &str = "/api/auth/me";
pub const PASSWORD_RESET_PATH: &str = "/api/auth/password-reset";
pub const PASSWORD_RESET_CONFIRM_PATH: &str = "/api/auth/password-reset-confirm";

/// Custom header the account API reads the access token from.
pub const TOKEN_HEADER: &str = "token";

#[derive(Clone, Debug)]
pub struct AccountApiBackend {
    api: ApiClient,
}

impl AccountApiBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AuthError> {
        Ok(Self { api: ApiClient::new(base_url, timeout)? })
    }
}

#[async_trait::async_trait]
impl AuthBackend for AccountApiBackend {
    fn name(&self) -> &'static str {
        "account"
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, AuthError> {
        let req = self.api.post(SIGNIN_PATH).json(credentials);
        let signin: SigninResponse = self.api.send(req, "Sign in failed").await?;
        if !signin.token_type.eq_ignore_ascii_case("bearer") {
            tracing::warn!(token_type = %signin.token_type, "unexpected token type from signin");
        }

        let user = self.fetch_profile(&signin.access_token).await?;
        Ok(AuthSession { token: signin.access_token, user })
    }

    async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        let body = AccountSignupRequest {
            email: &data.email,
            password: &data.password,
            fullname: &data.name,
            avatar: data.avatar.as_deref(),
            dob: data.dob.as_deref(),
        };
        let req = self.api.post(SIGNUP_PATH).json(&body);
        let resp: AccountSignupResponse = self.api.send(req, "Signup failed").await?;
        Ok(SignupOutcome::VerificationRequired {
            email: resp.email,
            message: resp.message,
            verification_code: resp.verification_code,
        })
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<Ack, AuthError> {
        let body = VerifyEmailRequest { email, verification_code: code };
        let req = self.api.post(VERIFY_EMAIL_PATH).json(&body);
        self.api.send(req, "Verification failed").await
    }

    async fn request_password_reset(&self, email: &str) -> Result<Ack, AuthError> {
        let req = self.api.post(PASSWORD_RESET_PATH).json(&PasswordResetRequest { email });
        self.api.send(req, "Failed to send reset email").await
    }

    async fn confirm_password_reset(&self, email: &str, reset_token: &str, new_password: &str) -> Result<Ack, AuthError> {
        let body = PasswordResetConfirmRequest { email, reset_token, new_password };
        let req = self.api.post(PASSWORD_RESET_CONFIRM_PATH).json(&body);
        self.api.send(req, "Failed to reset password").await
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, AuthError> {
        let req = self.api.get(ME_PATH).header(TOKEN_HEADER, token);
        let profile: UserProfile = self.api.send(req, "Profile request failed").await?;
        Ok(profile.into())
    }
}
