//! In-memory account registry.
//!
//! DESIGN
//! ======
//! Accounts are keyed by normalized email and live for the lifetime of the
//! process. The store is seeded with a verified demo account so both API
//! variants can sign in out of the box.
//!
//! Verification codes and reset tokens are six-digit numbers stored only as
//! SHA-256 hashes; passwords are stored as salted SHA-256. A pending code
//! expires after fifteen minutes and is burned after five wrong attempts.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::Rng;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

pub const DEMO_USER_ID: &str = "1";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_NAME: &str = "Demo User";

pub const MIN_PASSWORD_LEN: usize = 8;
const CODE_LEN: usize = 6;
const CODE_TTL: time::Duration = time::Duration::minutes(15);
const MAX_FAILED_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("Name is required")]
    MissingName,
    #[error("An account with this email already exists")]
    AlreadyExists,
    #[error("User not found")]
    NotFound,
    #[error("Email or password is incorrect")]
    InvalidCredentials,
    #[error("Email not verified")]
    NotVerified,
    #[error("Email already verified")]
    AlreadyVerified,
    #[error("Invalid or expired verification code")]
    InvalidCode,
    #[error("Invalid or expired reset token")]
    InvalidResetToken,
}

// =============================================================================
// HASHING
// =============================================================================

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[must_use]
pub fn hash_code(code: &str) -> String {
    bytes_to_hex(&Sha256::digest(code.trim().as_bytes()))
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

#[derive(Clone)]
struct PasswordHash {
    salt: String,
    hash: String,
}

impl PasswordHash {
    fn new(password: &str) -> Self {
        let salt: [u8; 16] = rand::rng().random();
        let salt = bytes_to_hex(&salt);
        let hash = hash_password(&salt, password);
        Self { salt, hash }
    }

    fn matches(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.hash
    }
}

enum Attempt {
    Accepted,
    Rejected,
    Spent,
}

#[derive(Clone)]
struct PendingCode {
    hash: String,
    expires_at: OffsetDateTime,
    attempts: u32,
}

impl PendingCode {
    fn new(code: &str, now: OffsetDateTime) -> Self {
        Self { hash: hash_code(code), expires_at: now + CODE_TTL, attempts: 0 }
    }

    fn attempt(&mut self, code: &str, now: OffsetDateTime) -> Attempt {
        if now >= self.expires_at {
            return Attempt::Spent;
        }
        if hash_code(code) == self.hash {
            return Attempt::Accepted;
        }
        self.attempts += 1;
        if self.attempts >= MAX_FAILED_ATTEMPTS { Attempt::Spent } else { Attempt::Rejected }
    }
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[derive(Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
    pub verified: bool,
    pub created_at: OffsetDateTime,
    password: PasswordHash,
    verification: Option<PendingCode>,
    reset: Option<PendingCode>,
}

impl Account {
    #[must_use]
    pub fn created_at_rfc3339(&self) -> Option<String> {
        self.created_at.format(&Rfc3339).ok()
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("verified", &self.verified)
            .finish_non_exhaustive()
    }
}

/// Registration input.
#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<String>,
    pub dob: Option<String>,
}

#[derive(Default)]
pub struct AccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the verified demo account.
    #[must_use]
    pub fn seeded() -> Self {
        let demo = Account {
            id: DEMO_USER_ID.to_owned(),
            email: DEMO_EMAIL.to_owned(),
            name: DEMO_NAME.to_owned(),
            avatar: None,
            dob: None,
            verified: true,
            created_at: OffsetDateTime::now_utc(),
            password: PasswordHash::new(DEMO_PASSWORD),
            verification: None,
            reset: None,
        };
        let store = Self::new();
        store.lock().insert(demo.email.clone(), demo);
        store
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn find(&self, email: &str) -> Option<Account> {
        let email = normalize_email(email)?;
        self.lock().get(&email).cloned()
    }

    /// Create an account. `verified` accounts can sign in immediately.
    ///
    /// # Errors
    ///
    /// Returns a validation error or [`AccountError::AlreadyExists`].
    pub fn register(&self, new: NewAccount, verified: bool) -> Result<Account, AccountError> {
        let email = normalize_email(&new.email).ok_or(AccountError::InvalidEmail)?;
        let name = new.name.trim();
        if name.is_empty() {
            return Err(AccountError::MissingName);
        }
        if new.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }

        let mut accounts = self.lock();
        if accounts.contains_key(&email) {
            return Err(AccountError::AlreadyExists);
        }
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            name: name.to_owned(),
            avatar: new.avatar.filter(|s| !s.trim().is_empty()),
            dob: new.dob.filter(|s| !s.trim().is_empty()),
            verified,
            created_at: OffsetDateTime::now_utc(),
            password: PasswordHash::new(&new.password),
            verification: None,
            reset: None,
        };
        accounts.insert(email, account.clone());
        Ok(account)
    }

    /// Replace any pending verification code with a fresh one and return it.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotFound`] or [`AccountError::AlreadyVerified`].
    pub fn issue_verification_code(&self, email: &str) -> Result<String, AccountError> {
        let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
        let mut accounts = self.lock();
        let account = accounts.get_mut(&email).ok_or(AccountError::NotFound)?;
        if account.verified {
            return Err(AccountError::AlreadyVerified);
        }
        let code = generate_code();
        account.verification = Some(PendingCode::new(&code, OffsetDateTime::now_utc()));
        Ok(code)
    }

    /// Mark the account verified if `code` matches its pending code.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCode`] for wrong, expired, or burned codes.
    pub fn verify_email(&self, email: &str, code: &str) -> Result<Account, AccountError> {
        let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
        let mut accounts = self.lock();
        let account = accounts.get_mut(&email).ok_or(AccountError::NotFound)?;
        if account.verified {
            return Err(AccountError::AlreadyVerified);
        }
        let pending = account.verification.as_mut().ok_or(AccountError::InvalidCode)?;
        match pending.attempt(code, OffsetDateTime::now_utc()) {
            Attempt::Accepted => {
                account.verified = true;
                account.verification = None;
                Ok(account.clone())
            }
            Attempt::Rejected => Err(AccountError::InvalidCode),
            Attempt::Spent => {
                account.verification = None;
                Err(AccountError::InvalidCode)
            }
        }
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let account = self.find(email).ok_or(AccountError::InvalidCredentials)?;
        if !account.password.matches(password) {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Start a password reset. Returns the reset token when the account exists.
    #[must_use]
    pub fn request_reset(&self, email: &str) -> Option<String> {
        let email = normalize_email(email)?;
        let mut accounts = self.lock();
        let account = accounts.get_mut(&email)?;
        let token = generate_code();
        account.reset = Some(PendingCode::new(&token, OffsetDateTime::now_utc()));
        Some(token)
    }

    /// Set a new password if `reset_token` matches the pending reset.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::WeakPassword`] or [`AccountError::InvalidResetToken`].
    pub fn confirm_reset(&self, email: &str, reset_token: &str, new_password: &str) -> Result<(), AccountError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountError::WeakPassword);
        }
        let email = normalize_email(email).ok_or(AccountError::InvalidResetToken)?;
        let mut accounts = self.lock();
        let account = accounts.get_mut(&email).ok_or(AccountError::InvalidResetToken)?;
        let pending = account.reset.as_mut().ok_or(AccountError::InvalidResetToken)?;
        match pending.attempt(reset_token, OffsetDateTime::now_utc()) {
            Attempt::Accepted => {
                account.password = PasswordHash::new(new_password);
                account.reset = None;
                Ok(())
            }
            Attempt::Rejected => Err(AccountError::InvalidResetToken),
            Attempt::Spent => {
                account.reset = None;
                Err(AccountError::InvalidResetToken)
            }
        }
    }
}

#[cfg(test)]
#[path = "accounts_test.rs"]
mod tests;
