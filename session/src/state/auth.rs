//! Session context — the single authority for "who is signed in".
//!
//! SYSTEM CONTEXT
//! ==============
//! Views read [`SessionState`] through `get_state()` / `subscribe()` and change
//! it only through the operations below. The context owns the backend
//! adapter, the token store, and the navigator, so nothing else in the
//! application mutates session truth.
//!
//! TRADE-OFFS
//! ==========
//! Last write wins. Validation is the only long-running read, so an epoch
//! counter bumped by login/signup/logout lets a late validation result see
//! that it has been superseded and drop itself instead of resurrecting (or
//! erasing) a session that changed while it was in flight. Other tabs or
//! processes sharing the same store are not notified.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::validator::SessionValidator;
use crate::config::{Routes, SessionConfig};
use crate::net::backend::{AuthBackend, build_backend};
use crate::net::error::AuthError;
use crate::net::types::{Ack, AuthSession, Credentials, SignupData, SignupOutcome, User};
use crate::store::TokenStore;
use crate::util::guard::RouteGuard;
use crate::util::navigate::Navigator;
use crate::util::validation;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
}

impl SessionState {
    /// State before the first validation completes.
    #[must_use]
    pub fn initial() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

pub struct SessionContext {
    backend: Arc<dyn AuthBackend>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    validator: SessionValidator,
    routes: Routes,
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
}

impl SessionContext {
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        routes: Routes,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        let validator = SessionValidator::new(backend.clone(), store.clone());
        Self { backend, store, navigator, validator, routes, state, epoch: AtomicU64::new(0) }
    }

    /// Build a context with the backend adapter selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be constructed.
    pub fn from_config(
        config: &SessionConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AuthError> {
        let backend = build_backend(config.backend, &config.api_url, config.request_timeout)?;
        Ok(Self::new(backend, store, navigator, config.routes.clone()))
    }

    // =========================================================================
    // READ SIDE
    // =========================================================================

    #[must_use]
    pub fn get_state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state change from now on.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// User cached next to the stored token. Unvalidated; for display only.
    #[must_use]
    pub fn cached_user(&self) -> Option<User> {
        self.store.cached_user()
    }

    /// A fresh guard for one mount of a protected view.
    #[must_use]
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.navigator.clone(), self.routes.sign_in.clone())
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Rebuild state from the token store by validating the stored token.
    pub async fn mount(&self) -> Option<User> {
        let mut epoch = 0;
        self.state.send_modify(|s| {
            epoch = self.epoch.load(Ordering::SeqCst);
            s.loading = true;
        });

        let user = self.validator.validate().await;

        // Check and publish under the state lock so a concurrent `commit`
        // lands either entirely before (and we drop out) or entirely after.
        let published = self.state.send_if_modified(|s| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *s = SessionState { user: user.clone(), loading: false };
            true
        });
        if !published {
            tracing::debug!("discarding validation superseded by a newer session change");
            return self.get_state().user;
        }
        user
    }

    /// Re-run validation on demand.
    pub async fn refresh(&self) -> Option<User> {
        self.mount().await
    }

    /// Exchange credentials for a session and land on the authenticated home.
    ///
    /// # Errors
    ///
    /// Returns the validation, backend, or store error; state is untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        validation::validate_credentials(credentials)?;
        let session = self.backend.login(credentials).await.inspect_err(|e| {
            tracing::info!(error = %e, backend = self.backend.name(), "login failed");
        })?;
        self.establish(session)
    }

    /// Create an account. Token-issuing backends sign the user in right away;
    /// verifying backends route to the code-entry view instead.
    ///
    /// # Errors
    ///
    /// Returns the validation, backend, or store error; state is untouched.
    pub async fn signup(&self, data: &SignupData) -> Result<SignupOutcome, AuthError> {
        validation::validate_signup(data)?;
        let outcome = self.backend.signup(data).await.inspect_err(|e| {
            tracing::info!(error = %e, backend = self.backend.name(), "signup failed");
        })?;

        match &outcome {
            SignupOutcome::Authenticated(session) => {
                self.establish(session.clone())?;
            }
            SignupOutcome::VerificationRequired { email, .. } => {
                tracing::info!(%email, "signup awaiting email verification");
                self.navigator.navigate(&self.routes.verify_email_for(email));
            }
        }
        Ok(outcome)
    }

    /// Confirm an emailed verification code, then route to sign-in.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<Ack, AuthError> {
        validation::validate_verification(email, code)?;
        let ack = self.backend.verify_email(email, code).await?;
        self.navigator.navigate(&self.routes.sign_in_verified());
        Ok(ack)
    }

    /// Ask the backend to send a reset code, then route to code entry.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error.
    pub async fn request_password_reset(&self, email: &str) -> Result<Ack, AuthError> {
        validation::validate_email(email)?;
        let ack = self.backend.request_password_reset(email).await?;
        self.navigator.navigate(&self.routes.reset_password_for(email));
        Ok(ack)
    }

    /// Set a new password with a reset code, then route to sign-in.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error.
    pub async fn confirm_password_reset(&self, email: &str, reset_token: &str, new_password: &str) -> Result<Ack, AuthError> {
        validation::validate_reset_confirm(email, reset_token, new_password)?;
        let ack = self
            .backend
            .confirm_password_reset(email, reset_token, new_password)
            .await?;
        self.navigator.navigate(&self.routes.sign_in);
        Ok(ack)
    }

    /// Drop the session and land on the public home. Safe to call repeatedly.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear token store on logout");
        }
        self.commit(None);
        self.navigator.navigate(&self.routes.public_home);
    }

    fn establish(&self, session: AuthSession) -> Result<User, AuthError> {
        self.store.set(&session.token, &session.user)?;
        self.commit(Some(session.user.clone()));
        tracing::info!(user_id = %session.user.id, backend = self.backend.name(), "session established");
        self.navigator.navigate(&self.routes.authenticated_home);
        Ok(session.user)
    }

    /// Publish a settled state and supersede any validation still in flight.
    /// The store must already reflect `user`.
    fn commit(&self, user: Option<User>) {
        self.state.send_modify(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *s = SessionState { user, loading: false };
        });
    }
}
