//! Session validator — confirms the stored token with the backend.
//!
//! ERROR HANDLING
//! ==============
//! "Cannot confirm" is treated as "not authenticated": any failure (401, other
//! non-2xx, transport error, bad body) clears the store and yields `None`.
//! Nothing is retried.

#[cfg(test)]
#[path = "validator_test.rs"]
mod validator_test;

use std::sync::Arc;

use crate::net::backend::AuthBackend;
use crate::net::error::ErrorKind;
use crate::net::types::User;
use crate::store::TokenStore;
use crate::util::jwt;

#[derive(Clone)]
pub struct SessionValidator {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn TokenStore>,
}

impl SessionValidator {
    #[must_use]
    pub fn new(backend: Arc<dyn AuthBackend>, store: Arc<dyn TokenStore>) -> Self {
        Self { backend, store }
    }

    pub async fn validate(&self) -> Option<User> {
        let token = self.store.token()?;

        if jwt::is_expired_at(&token, jwt::now_unix()) {
            tracing::debug!("stored token expired locally");
            self.discard(&token);
            return None;
        }

        match self.backend.fetch_profile(&token).await {
            Ok(user) => Some(user),
            Err(e) => {
                if e.kind() == ErrorKind::Network {
                    tracing::warn!(error = %e, backend = self.backend.name(), "session validation could not reach backend");
                } else {
                    tracing::debug!(error = %e, backend = self.backend.name(), "session validation rejected");
                }
                self.discard(&token);
                None
            }
        }
    }

    /// Clear the store, unless a newer token replaced `token` meanwhile.
    fn discard(&self, token: &str) {
        match self.store.clear_if(token) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("token replaced during validation, keeping newer session"),
            Err(e) => tracing::warn!(error = %e, "failed to clear token store"),
        }
    }
}
