//! Session state owned by the application.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the session context and the state it publishes; `validator`
//! confirms a stored token with the backend on mount and refresh.

pub mod auth;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_helpers;
