//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view applies the same rule: wait while the session is
//! loading, render once a user is present, otherwise redirect to sign-in
//! exactly once. A guard is created per mount; its outcome is final for that
//! mount.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::Arc;

use tokio::sync::watch;

use super::navigate::Navigator;
use crate::state::auth::SessionState;

/// `true` once auth has loaded and no user is present.
#[must_use]
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    !state.loading && state.user.is_none()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Session still resolving; show a placeholder, do not redirect.
    Pending,
    /// Authenticated; render the wrapped view.
    Allowed,
    /// Unauthenticated; a redirect to sign-in has been issued.
    Denied,
}

impl GuardState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

pub struct RouteGuard {
    navigator: Arc<dyn Navigator>,
    sign_in: String,
    state: GuardState,
}

impl RouteGuard {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>, sign_in: impl Into<String>) -> Self {
        Self { navigator, sign_in: sign_in.into(), state: GuardState::Pending }
    }

    #[must_use]
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Feed the latest session state. Terminal outcomes are sticky.
    pub fn observe(&mut self, session: &SessionState) -> GuardState {
        if self.state.is_terminal() || session.loading {
            return self.state;
        }
        if session.user.is_some() {
            self.state = GuardState::Allowed;
        } else {
            tracing::debug!(to = %self.sign_in, "route guard denied unauthenticated viewer");
            self.navigator.navigate(&self.sign_in);
            self.state = GuardState::Denied;
        }
        self.state
    }

    /// Render `view` if allowed. `None` while pending and after a denial.
    pub fn render<T>(&mut self, session: &SessionState, view: impl FnOnce() -> T) -> Option<T> {
        match self.observe(session) {
            GuardState::Allowed => Some(view()),
            GuardState::Pending | GuardState::Denied => None,
        }
    }

    /// Wait on a session subscription until the guard resolves.
    ///
    /// If the session context is dropped while still loading, the guard
    /// resolves from the last state it saw, treating a still-loading session
    /// as unauthenticated.
    pub async fn wait(&mut self, mut rx: watch::Receiver<SessionState>) -> GuardState {
        loop {
            let current = rx.borrow_and_update().clone();
            if self.observe(&current).is_terminal() {
                return self.state;
            }
            if rx.changed().await.is_err() {
                let settled = SessionState { loading: false, ..current };
                return self.observe(&settled);
            }
        }
    }
}
