//! Account API routes: verified signup, sign-in, profile, password reset.
//!
//! SYSTEM CONTEXT
//! ==============
//! Signup creates an unverified account and emits a six-digit code; sign-in
//! is refused until the code is confirmed. The access token travels in a
//! custom `token` header, and every failure body is `{detail}`.
//!
//! There is no mail delivery. Codes are logged at `info`, and with
//! `ECHO_CODES` enabled they are also returned in the API reply.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::services::accounts::{AccountError, NewAccount, normalize_email};
use crate::services::token::Claims;
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "token";
const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignupResponse {
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub verification_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SigninResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub email: String,
    pub fullname: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
    pub is_verified: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub reset_token: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self { message: message.to_owned(), reset_token: None }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

fn detail(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "detail": message.into() });
    (status, Json(body)).into_response()
}

fn status_for(err: &AccountError) -> StatusCode {
    match err {
        AccountError::InvalidEmail
        | AccountError::WeakPassword
        | AccountError::MissingName
        | AccountError::AlreadyVerified
        | AccountError::InvalidCode
        | AccountError::InvalidResetToken => StatusCode::BAD_REQUEST,
        AccountError::AlreadyExists => StatusCode::CONFLICT,
        AccountError::NotFound => StatusCode::NOT_FOUND,
        AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountError::NotVerified => StatusCode::FORBIDDEN,
    }
}

fn account_error(err: AccountError) -> Response {
    detail(status_for(&err), err.to_string())
}

fn bad_body(e: &JsonRejection) -> Response {
    tracing::debug!(error = %e, "request body rejected");
    detail(StatusCode::UNPROCESSABLE_ENTITY, "Invalid request body")
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller authenticated by the `token` header.
pub struct TokenUser {
    pub claims: Claims,
}

impl<S> axum::extract::FromRequestParts<S> for TokenUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated"));
        };

        let app_state = AppState::from_ref(state);
        match app_state.tokens.verify(token) {
            Ok(claims) => Ok(Self { claims }),
            Err(e) => {
                tracing::debug!(error = %e, "access token rejected");
                Err(detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/signup` — create an unverified account and issue a code.
pub async fn signup(State(state): State<AppState>, payload: Result<Json<SignupRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(&e),
    };

    let new = NewAccount {
        email: req.email,
        password: req.password,
        name: req.fullname,
        avatar: req.avatar,
        dob: req.dob,
    };
    let account = match state.accounts.register(new, false) {
        Ok(account) => account,
        Err(e) => return account_error(e),
    };
    let code = match state.accounts.issue_verification_code(&account.email) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, email = %account.email, "verification code issue failed");
            return detail(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
        }
    };
    tracing::info!(email = %account.email, code = %code, "verification code issued");

    let body = SignupResponse {
        email: account.email,
        message: "Account created. Check your email for a verification code.".to_owned(),
        verification_code: state.config.echo_codes.then_some(code),
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// `POST /api/auth/verify-email` — confirm the emailed code.
pub async fn verify_email(State(state): State<AppState>, payload: Result<Json<VerifyEmailRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(&e),
    };

    match state.accounts.verify_email(&req.email, &req.verification_code) {
        Ok(account) => {
            tracing::info!(email = %account.email, "email verified");
            Json(MessageResponse::new("Email verified successfully")).into_response()
        }
        Err(e) => {
            tracing::info!(email = %req.email, error = %e, "email verification rejected");
            account_error(e)
        }
    }
}

/// `POST /api/auth/signin` — exchange credentials for an access token.
pub async fn signin(State(state): State<AppState>, payload: Result<Json<SigninRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(&e),
    };

    let account = match state.accounts.authenticate(&req.email, &req.password) {
        Ok(account) => account,
        Err(e) => {
            tracing::info!(email = %req.email, "signin rejected");
            return account_error(e);
        }
    };
    if !account.verified {
        return account_error(AccountError::NotVerified);
    }

    let access_token = match state.tokens.issue(&account.id, &account.email) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, user_id = %account.id, "token issue failed");
            return detail(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong");
        }
    };
    tracing::info!(user_id = %account.id, "signin succeeded");

    Json(SigninResponse {
        access_token,
        token_type: TOKEN_TYPE.to_owned(),
        expires_in: state.tokens.ttl().as_secs(),
        email: account.email,
    })
    .into_response()
}

/// `GET /api/auth/me` — profile of the token's owner.
pub async fn me(State(state): State<AppState>, auth: TokenUser) -> Response {
    let Some(account) = state.accounts.find(&auth.claims.email) else {
        return account_error(AccountError::NotFound);
    };
    Json(UserProfile {
        created_at: account.created_at_rfc3339(),
        email: account.email,
        fullname: account.name,
        avatar: account.avatar,
        dob: account.dob,
        is_verified: account.verified,
    })
    .into_response()
}

/// `POST /api/auth/password-reset` — start a reset. The reply never reveals
/// whether the account exists.
pub async fn password_reset(State(state): State<AppState>, payload: Result<Json<PasswordResetRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(&e),
    };
    if normalize_email(&req.email).is_none() {
        return account_error(AccountError::InvalidEmail);
    }

    let token = state.accounts.request_reset(&req.email);
    match &token {
        Some(token) => tracing::info!(email = %req.email, reset_token = %token, "password reset token issued"),
        None => tracing::info!(email = %req.email, "password reset requested for unknown account"),
    }

    let mut body = MessageResponse::new("If an account exists for this email, a reset code has been sent");
    if state.config.echo_codes {
        body.reset_token = token;
    }
    Json(body).into_response()
}

/// `POST /api/auth/password-reset-confirm` — set a new password.
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    payload: Result<Json<PasswordResetConfirmRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => return bad_body(&e),
    };

    match state.accounts.confirm_reset(&req.email, &req.reset_token, &req.new_password) {
        Ok(()) => {
            tracing::info!(email = %req.email, "password reset completed");
            Json(MessageResponse::new("Password has been reset successfully")).into_response()
        }
        Err(e) => {
            tracing::info!(email = %req.email, error = %e, "password reset rejected");
            account_error(e)
        }
    }
}

#[cfg(test)]
#[path = "account_api_test.rs"]
mod tests;
