//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One process serves one wire dialect, picked by `MOCK_API_VARIANT`. Both
//! dialects share `/api/auth/signup` but disagree on its body and reply, so
//! the variants are mounted as separate routers rather than merged.

pub mod account_api;
pub mod mock_api;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiVariant;
use crate::state::AppState;

/// Full application router for the configured variant.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = match state.config.variant {
        ApiVariant::Mock => mock_routes(),
        ApiVariant::Account => account_routes(),
    };

    api.route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn mock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(mock_api::login))
        .route("/api/auth/signup", post(mock_api::signup))
        .route("/api/profile", get(mock_api::profile))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(account_api::signup))
        .route("/api/auth/verify-email", post(account_api::verify_email))
        .route("/api/auth/signin", post(account_api::signin))
        .route("/api/auth/me", get(account_api::me))
        .route("/api/auth/password-reset", post(account_api::password_reset))
        .route("/api/auth/password-reset-confirm", post(account_api::password_reset_confirm))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
