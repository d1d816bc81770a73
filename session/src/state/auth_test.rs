use super::*;
use crate::net::error::ErrorKind;
use crate::net::types::SignupOutcome;
use crate::state::test_helpers::{MockBackend, demo_session, demo_user, unauthorized};
use crate::store::{MemoryTokenStore, StoreError};
use crate::util::guard::GuardState;
use crate::util::navigate::RecordingNavigator;

struct Harness {
    ctx: SessionContext,
    backend: Arc<MockBackend>,
    store: Arc<MemoryTokenStore>,
    nav: Arc<RecordingNavigator>,
}

fn harness_with(backend: MockBackend, store: MemoryTokenStore) -> Harness {
    let backend = Arc::new(backend);
    let store = Arc::new(store);
    let nav = Arc::new(RecordingNavigator::new());
    let ctx = SessionContext::new(backend.clone(), store.clone(), nav.clone(), Routes::default());
    Harness { ctx, backend, store, nav }
}

fn harness() -> Harness {
    harness_with(MockBackend::new(), MemoryTokenStore::new())
}

fn demo_credentials() -> Credentials {
    Credentials::new("demo@example.com", "password123")
}

// =============================================================================
// STATE
// =============================================================================

#[test]
fn initial_state_is_loading_without_user() {
    let h = harness();
    let state = h.ctx.get_state();
    assert!(state.loading);
    assert!(state.user.is_none());
    assert!(!h.ctx.is_authenticated());
    assert_eq!(SessionState::default(), SessionState::initial());
}

#[tokio::test]
async fn mount_with_empty_store_settles_unauthenticated() {
    let h = harness();
    assert_eq!(h.ctx.mount().await, None);
    assert_eq!(h.ctx.get_state(), SessionState { user: None, loading: false });
    assert_eq!(h.backend.profiles(), 0);
}

#[tokio::test]
async fn mount_restores_validated_user() {
    let backend = MockBackend::new();
    backend.push_profile(Ok(demo_user()));
    let h = harness_with(backend, MemoryTokenStore::with_session("tok", demo_user()));

    assert_eq!(h.ctx.mount().await, Some(demo_user()));
    assert!(h.ctx.is_authenticated());
    assert!(!h.ctx.get_state().loading);
}

#[tokio::test]
async fn mount_with_rejected_token_clears_everything() {
    let backend = MockBackend::new();
    backend.push_profile(Err(unauthorized("Invalid token")));
    let h = harness_with(backend, MemoryTokenStore::with_session("tampered", demo_user()));

    assert_eq!(h.ctx.mount().await, None);
    assert_eq!(h.store.token(), None);
    assert_eq!(h.ctx.cached_user(), None);
    assert_eq!(h.ctx.get_state(), SessionState { user: None, loading: false });
}

#[tokio::test]
async fn refresh_revalidates() {
    let backend = MockBackend::new();
    backend.push_profile(Ok(demo_user()));
    backend.push_profile(Err(unauthorized("Token expired")));
    let h = harness_with(backend, MemoryTokenStore::with_session("tok", demo_user()));

    assert!(h.ctx.mount().await.is_some());
    assert!(h.ctx.refresh().await.is_none());
    assert_eq!(h.backend.profiles(), 2);
    assert!(!h.ctx.is_authenticated());
}

#[tokio::test]
async fn subscribers_see_loading_then_settled() {
    let backend = MockBackend::new();
    backend.push_profile(Ok(demo_user()));
    let h = harness_with(backend, MemoryTokenStore::with_session("tok", demo_user()));
    let mut rx = h.ctx.subscribe();

    h.ctx.mount().await;
    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.user, Some(demo_user()));
    assert!(!state.loading);
}

// =============================================================================
// LOGIN / LOGOUT
// =============================================================================

#[tokio::test]
async fn login_stores_token_and_navigates_home() {
    let h = harness();
    h.backend.push_login(Ok(demo_session("tok-1")));

    let user = h.ctx.login(&demo_credentials()).await.unwrap();

    assert_eq!(user, demo_user());
    assert_eq!(h.store.token().as_deref(), Some("tok-1"));
    assert_eq!(h.ctx.cached_user(), Some(demo_user()));
    assert_eq!(h.ctx.get_state(), SessionState { user: Some(demo_user()), loading: false });
    assert_eq!(h.nav.last().as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn failed_login_leaves_state_untouched() {
    let h = harness();
    h.ctx.mount().await;

    let err = h.ctx.login(&Credentials::new("demo@example.com", "wrong")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert!(err.to_string().contains("incorrect"));
    assert_eq!(h.store.token(), None);
    assert!(!h.ctx.is_authenticated());
    assert!(h.nav.paths().is_empty());
}

#[tokio::test]
async fn invalid_input_never_reaches_backend() {
    let h = harness();

    let err = h.ctx.login(&Credentials::new("not-an-email", "")).await.unwrap_err();

    let AuthError::Validation(fields) = &err else { panic!("expected validation error, got {err:?}") };
    assert!(fields.get("email").is_some());
    assert_eq!(fields.get("password"), Some("Password is required"));
    assert_eq!(h.backend.logins(), 0);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let h = harness();
    h.backend.push_login(Ok(demo_session("tok")));
    h.ctx.login(&demo_credentials()).await.unwrap();

    h.ctx.logout();
    h.ctx.logout();

    assert_eq!(h.store.token(), None);
    assert_eq!(h.ctx.get_state(), SessionState { user: None, loading: false });
    assert_eq!(h.nav.paths(), vec!["/dashboard", "/", "/"]);
}

#[tokio::test]
async fn login_during_validation_wins() {
    let (backend, gate) = MockBackend::gated();
    backend.push_profile(Err(unauthorized("Invalid token")));
    backend.push_login(Ok(demo_session("fresh")));
    let h = harness_with(backend, MemoryTokenStore::with_session("stale", demo_user()));

    let (mounted, logged_in) = tokio::join!(h.ctx.mount(), async {
        let user = h.ctx.login(&demo_credentials()).await;
        gate.notify_one();
        user
    });

    assert!(logged_in.is_ok());
    assert_eq!(mounted, Some(demo_user()));
    assert_eq!(h.store.token().as_deref(), Some("fresh"));
    assert_eq!(h.ctx.get_state(), SessionState { user: Some(demo_user()), loading: false });
}

#[tokio::test]
async fn logout_during_validation_is_not_undone() {
    let (backend, gate) = MockBackend::gated();
    backend.push_profile(Ok(demo_user()));
    let h = harness_with(backend, MemoryTokenStore::with_session("tok", demo_user()));

    let (mounted, ()) = tokio::join!(h.ctx.mount(), async {
        h.ctx.logout();
        gate.notify_one();
    });

    assert_eq!(mounted, None);
    assert!(!h.ctx.is_authenticated());
    assert_eq!(h.store.token(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_mount_and_login_settle_on_new_session() {
    let fresh = User::basic("2", "fresh@example.com", "Fresh User");
    for _ in 0..100 {
        let backend = MockBackend::new();
        backend.accept_token("fresh", fresh.clone());
        backend.push_login(Ok(AuthSession { token: "fresh".into(), user: fresh.clone() }));
        let h = harness_with(backend, MemoryTokenStore::with_session("stale", demo_user()));
        let ctx = Arc::new(h.ctx);

        let mounting = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.mount().await }
        });
        let logging_in = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.login(&demo_credentials()).await }
        });
        mounting.await.unwrap();
        logging_in.await.unwrap().unwrap();

        assert_eq!(h.store.token().as_deref(), Some("fresh"));
        assert_eq!(ctx.get_state(), SessionState { user: Some(fresh.clone()), loading: false });
    }
}

struct ReadOnlyStore;

impl TokenStore for ReadOnlyStore {
    fn token(&self) -> Option<String> {
        None
    }

    fn cached_user(&self) -> Option<User> {
        None
    }

    fn set(&self, _token: &str, _user: &User) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only")))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn clear_if(&self, _token: &str) -> Result<bool, StoreError> {
        Ok(false)
    }
}

#[tokio::test]
async fn store_failure_surfaces_and_keeps_user_signed_out() {
    let backend = Arc::new(MockBackend::new());
    backend.push_login(Ok(demo_session("tok")));
    let nav = Arc::new(RecordingNavigator::new());
    let ctx = SessionContext::new(backend, Arc::new(ReadOnlyStore), nav.clone(), Routes::default());

    let err = ctx.login(&demo_credentials()).await.unwrap_err();

    assert!(matches!(err, AuthError::Store(_)));
    assert!(!ctx.is_authenticated());
    assert!(nav.paths().is_empty());
}

// =============================================================================
// SIGNUP / VERIFY / RESET
// =============================================================================

#[tokio::test]
async fn token_issuing_signup_signs_in() {
    let h = harness();
    h.backend.push_signup(Ok(SignupOutcome::Authenticated(demo_session("new-tok"))));

    let outcome = h
        .ctx
        .signup(&SignupData::new("Demo User", "demo@example.com", "password123"))
        .await
        .unwrap();

    assert!(matches!(outcome, SignupOutcome::Authenticated(_)));
    assert_eq!(h.store.token().as_deref(), Some("new-tok"));
    assert!(h.ctx.is_authenticated());
    assert_eq!(h.nav.last().as_deref(), Some("/dashboard"));
}

#[tokio::test]
async fn verifying_signup_routes_to_code_entry() {
    let h = harness();
    h.backend.push_signup(Ok(SignupOutcome::VerificationRequired {
        email: "new+user@example.com".into(),
        message: "Check your inbox".into(),
        verification_code: None,
    }));

    h.ctx
        .signup(&SignupData::new("New User", "new+user@example.com", "password123"))
        .await
        .unwrap();

    assert_eq!(h.store.token(), None);
    assert!(!h.ctx.is_authenticated());
    assert_eq!(h.nav.last().as_deref(), Some("/auth/verify-email?email=new%2Buser%40example.com"));
}

#[tokio::test]
async fn signup_rejects_short_password_locally() {
    let h = harness();
    let err = h
        .ctx
        .signup(&SignupData::new("Demo", "demo@example.com", "short"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn verify_email_routes_to_sign_in() {
    let h = harness();
    h.ctx.verify_email("demo@example.com", "123456").await.unwrap();
    assert_eq!(h.nav.last().as_deref(), Some("/auth/signin?verified=true"));
}

#[tokio::test]
async fn verify_email_requires_six_digits() {
    let h = harness();
    let err = h.ctx.verify_email("demo@example.com", "12a").await.unwrap_err();
    let AuthError::Validation(fields) = err else { panic!("expected validation error") };
    assert_eq!(fields.get("code"), Some("Please enter all 6 digits"));
    assert_eq!(h.backend.acks(), 0);
}

#[tokio::test]
async fn reset_request_then_confirm_navigates() {
    let h = harness();
    h.ctx.request_password_reset("demo@example.com").await.unwrap();
    assert_eq!(h.nav.last().as_deref(), Some("/auth/reset-password?email=demo%40example.com"));

    h.ctx
        .confirm_password_reset("demo@example.com", "654321", "newpassword1")
        .await
        .unwrap();
    assert_eq!(h.nav.last().as_deref(), Some("/auth/signin"));
}

#[tokio::test]
async fn rejected_reset_does_not_navigate() {
    let h = harness();
    h.backend.push_ack(Err(AuthError::Rejected { status: 400, message: "Invalid or expired reset token".into() }));

    let err = h
        .ctx
        .confirm_password_reset("demo@example.com", "000000", "newpassword1")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid or expired reset token");
    assert!(h.nav.paths().is_empty());
}

// =============================================================================
// GUARD
// =============================================================================

#[tokio::test]
async fn guard_from_context_redirects_once_after_mount() {
    let h = harness();
    let mut guard = h.ctx.guard();
    assert_eq!(guard.observe(&h.ctx.get_state()), GuardState::Pending);

    h.ctx.mount().await;
    assert_eq!(guard.observe(&h.ctx.get_state()), GuardState::Denied);
    assert_eq!(guard.observe(&h.ctx.get_state()), GuardState::Denied);
    assert_eq!(h.nav.paths(), vec!["/auth/signin"]);
}
