//! Token Store: persistent holder of the bearer token and cached user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the only shared mutable resource in the session layer. It is
//! synchronous so callers can read or clear it before any request resolves.
//! `MemoryTokenStore` backs tests; `FileTokenStore` persists across runs for
//! terminal clients.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Token and cached user, persisted together and invalidated together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Capability interface over client-side session storage.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;

    fn cached_user(&self) -> Option<User>;

    /// Persist a fresh token together with its user, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    fn set(&self, token: &str, user: &User) -> Result<(), StoreError>;

    /// Remove the token and cached user. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;

    /// Clear only if the store still holds `token`. Returns whether it cleared.
    ///
    /// Implementations must check and clear atomically so a `set` racing
    /// with this call is never wiped.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state cannot be removed.
    fn clear_if(&self, token: &str) -> Result<bool, StoreError>;
}
