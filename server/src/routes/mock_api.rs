//! Mock API routes: demo login, token-issuing signup, bearer-protected profile.
//!
//! Error bodies are `{error, message}`; `message` is meant for display.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};

use crate::services::accounts::{Account, AccountError, NewAccount, normalize_email};
use crate::services::token::Claims;
use crate::state::AppState;

const FALLBACK_NAME: &str = "User";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBody {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&Account> for UserBody {
    fn from(account: &Account) -> Self {
        Self { id: account.id.clone(), email: account.email.clone(), name: account.name.clone() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthTokens {
    pub token: String,
    pub user: UserBody,
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": error, "message": message.into() });
    (status, Json(body)).into_response()
}

fn validation_failed(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "Validation failed", message)
}

fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", "Something went wrong")
}

fn issue_tokens(state: &AppState, account: &Account) -> Result<AuthTokens, Response> {
    let token = state.tokens.issue(&account.id, &account.email).map_err(|e| {
        tracing::error!(error = %e, user_id = %account.id, "token issue failed");
        internal_error()
    })?;
    Ok(AuthTokens { token, user: account.into() })
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Caller authenticated by `Authorization: Bearer <token>`.
pub struct BearerUser {
    pub claims: Claims,
}

impl<S> axum::extract::FromRequestParts<S> for BearerUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(error_response(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Missing or invalid authorization header",
            ));
        };

        let app_state = AppState::from_ref(state);
        match app_state.tokens.verify(token) {
            Ok(claims) => Ok(Self { claims }),
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid or expired token"))
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login` — check credentials, return `{token, user}`.
pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::debug!(error = %e, "login body rejected");
            return validation_failed("Invalid request body");
        }
    };
    if normalize_email(&req.email).is_none() {
        return validation_failed("Invalid email address");
    }
    if req.password.is_empty() {
        return validation_failed("Password is required");
    }

    let account = match state.accounts.authenticate(&req.email, &req.password) {
        Ok(account) => account,
        Err(e) => {
            tracing::info!(email = %req.email, error = %e, "login rejected");
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials", "Email or password is incorrect");
        }
    };

    match issue_tokens(&state, &account) {
        Ok(tokens) => {
            tracing::info!(user_id = %account.id, "login succeeded");
            Json(tokens).into_response()
        }
        Err(resp) => resp,
    }
}

/// `POST /api/auth/signup` — create an account and sign it in immediately.
pub async fn signup(State(state): State<AppState>, payload: Result<Json<SignupRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::debug!(error = %e, "signup body rejected");
            return validation_failed("Invalid request body");
        }
    };

    let new = NewAccount { email: req.email, password: req.password, name: req.name, avatar: None, dob: None };
    let account = match state.accounts.register(new, true) {
        Ok(account) => account,
        Err(AccountError::AlreadyExists) => {
            return error_response(StatusCode::CONFLICT, "Conflict", AccountError::AlreadyExists.to_string());
        }
        Err(e) => return validation_failed(e.to_string()),
    };

    match issue_tokens(&state, &account) {
        Ok(tokens) => {
            tracing::info!(user_id = %account.id, email = %account.email, "account created");
            (StatusCode::CREATED, Json(tokens)).into_response()
        }
        Err(resp) => resp,
    }
}

/// `GET /api/profile` — return the caller's `{id, email, name}`.
pub async fn profile(State(state): State<AppState>, auth: BearerUser) -> Json<UserBody> {
    let name = state
        .accounts
        .find(&auth.claims.email)
        .map_or_else(|| FALLBACK_NAME.to_owned(), |account| account.name);
    Json(UserBody { id: auth.claims.user_id, email: auth.claims.email, name })
}

#[cfg(test)]
#[path = "mock_api_test.rs"]
mod tests;
