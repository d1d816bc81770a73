//! JSON-file token store for terminal clients.
//!
//! TRADE-OFFS
//! ==========
//! Every read goes to disk, so two processes sharing a file see each other's
//! logins and logouts on their next call. Writes go through a sibling temp file
//! and a rename so a crash never leaves a half-written session behind.
//! Writers within one process are serialized by a lock shared between clones;
//! writers in other processes are not.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{StoreError, StoredSession, TokenStore};
use crate::net::types::User;

#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Arc::default() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the stored session. Missing and unreadable files read as empty.
    fn load(&self) -> Option<StoredSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token file unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token file corrupt, ignoring");
                None
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        self.load().map(|s| s.token)
    }

    fn cached_user(&self) -> Option<User> {
        self.load().map(|s| s.user)
    }

    fn set(&self, token: &str, user: &User) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let _guard = self.lock();
        let session = StoredSession { token: token.to_owned(), user: user.clone() };
        let json = serde_json::to_vec_pretty(&session)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock();
        self.remove()
    }

    fn clear_if(&self, token: &str) -> Result<bool, StoreError> {
        let _guard = self.lock();
        if self.load().is_none_or(|s| s.token != token) {
            return Ok(false);
        }
        self.remove()?;
        Ok(true)
    }
}
