//! # session
//!
//! Client-side authentication session management for a web front end.
//!
//! The crate keeps one authoritative answer to "who is signed in", persists
//! the bearer token between runs, validates it against whichever backend the
//! deployment talks to, and tells protected views when to redirect. Two
//! backend dialects are supported behind [`net::backend::AuthBackend`]: a
//! token-issuing mock API and an account service that verifies email before
//! sign-in.

pub mod config;
pub mod net;
pub mod state;
pub mod store;
pub mod util;

pub use config::{ConfigError, Routes, SessionConfig};
pub use net::backend::{AuthBackend, BackendKind, build_backend};
pub use net::error::{AuthError, ErrorKind, FieldError, FieldErrors};
pub use net::types::{Ack, AuthSession, Credentials, SignupData, SignupOutcome, User};
pub use state::auth::{SessionContext, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
pub use util::guard::{GuardState, RouteGuard};
pub use util::navigate::{Navigator, RecordingNavigator, TracingNavigator};
