//! # server
//!
//! Mock authentication backend. Serves either the token-issuing mock API or
//! the account API (email verification and password reset) so session
//! clients can be exercised end to end without a real identity service.

pub mod config;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiVariant, ConfigError, ServerConfig};
pub use routes::app;
pub use state::AppState;
