#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StoreError, StoredSession, TokenStore};
use crate::net::types::User;

/// In-process token store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a session, e.g. to simulate a previous run.
    #[must_use]
    pub fn with_session(token: impl Into<String>, user: User) -> Self {
        Self { inner: Mutex::new(Some(StoredSession { token: token.into(), user })) }
    }

    fn lock(&self) -> MutexGuard<'_, Option<StoredSession>> {
        // A panic mid-write cannot leave a half-written Option behind.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    fn cached_user(&self) -> Option<User> {
        self.lock().as_ref().map(|s| s.user.clone())
    }

    fn set(&self, token: &str, user: &User) -> Result<(), StoreError> {
        *self.lock() = Some(StoredSession { token: token.to_owned(), user: user.clone() });
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = None;
        Ok(())
    }

    fn clear_if(&self, token: &str) -> Result<bool, StoreError> {
        let mut guard = self.lock();
        if guard.as_ref().is_some_and(|s| s.token == token) {
            *guard = None;
            return Ok(true);
        }
        Ok(false)
    }
}
