use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::net::backend::AuthBackend;
use crate::net::error::AuthError;
use crate::net::types::{Ack, AuthSession, Credentials, SignupData, SignupOutcome, User};

/// Scripted backend: each call pops the next queued reply for its operation.
#[derive(Default)]
pub struct MockBackend {
    logins: Mutex<VecDeque<Result<AuthSession, AuthError>>>,
    signups: Mutex<VecDeque<Result<SignupOutcome, AuthError>>>,
    profiles: Mutex<VecDeque<Result<User, AuthError>>>,
    accepted: Mutex<HashMap<String, User>>,
    acks: Mutex<VecDeque<Result<Ack, AuthError>>>,
    profile_gate: Option<Arc<Notify>>,
    pub login_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub ack_calls: AtomicUsize,
    pub seen_tokens: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `fetch_profile` blocks until the returned handle is notified.
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (Self { profile_gate: Some(gate.clone()), ..Self::default() }, gate)
    }

    pub fn push_login(&self, reply: Result<AuthSession, AuthError>) {
        self.logins.lock().unwrap().push_back(reply);
    }

    pub fn push_signup(&self, reply: Result<SignupOutcome, AuthError>) {
        self.signups.lock().unwrap().push_back(reply);
    }

    pub fn push_profile(&self, reply: Result<User, AuthError>) {
        self.profiles.lock().unwrap().push_back(reply);
    }

    /// `fetch_profile` answers `token` with `user` every time, ahead of the queue.
    pub fn accept_token(&self, token: &str, user: User) {
        self.accepted.lock().unwrap().insert(token.to_owned(), user);
    }

    pub fn push_ack(&self, reply: Result<Ack, AuthError>) {
        self.acks.lock().unwrap().push_back(reply);
    }

    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn profiles(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn acks(&self) -> usize {
        self.ack_calls.load(Ordering::SeqCst)
    }

    fn next_ack(&self) -> Result<Ack, AuthError> {
        self.ack_calls.fetch_add(1, Ordering::SeqCst);
        self.acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Ack { message: "ok".into(), reset_token: None }))
    }
}

#[async_trait::async_trait]
impl AuthBackend for MockBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn login(&self, _credentials: &Credentials) -> Result<AuthSession, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.logins
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unauthorized("Email or password is incorrect")))
    }

    async fn signup(&self, _data: &SignupData) -> Result<SignupOutcome, AuthError> {
        self.signups
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::Server { status: 500, message: "no signup scripted".into() }))
    }

    async fn verify_email(&self, _email: &str, _code: &str) -> Result<Ack, AuthError> {
        self.next_ack()
    }

    async fn request_password_reset(&self, _email: &str) -> Result<Ack, AuthError> {
        self.next_ack()
    }

    async fn confirm_password_reset(&self, _email: &str, _reset_token: &str, _new_password: &str) -> Result<Ack, AuthError> {
        self.next_ack()
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, AuthError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens.lock().unwrap().push(token.to_owned());
        if let Some(gate) = &self.profile_gate {
            gate.notified().await;
        }
        if let Some(user) = self.accepted.lock().unwrap().get(token).cloned() {
            return Ok(user);
        }
        self.profiles
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unauthorized("Invalid token")))
    }
}

pub fn unauthorized(message: &str) -> AuthError {
    AuthError::Authentication { status: 401, message: message.to_owned() }
}

pub fn demo_user() -> User {
    User::basic("1", "demo@example.com", "Demo User")
}

pub fn demo_session(token: &str) -> AuthSession {
    AuthSession { token: token.to_owned(), user: demo_user() }
}
