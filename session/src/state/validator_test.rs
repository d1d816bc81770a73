use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;

use super::*;
use crate::net::error::AuthError;
use crate::state::test_helpers::{MockBackend, demo_user, unauthorized};
use crate::store::MemoryTokenStore;

fn validator_with(backend: MockBackend, store: MemoryTokenStore) -> (SessionValidator, Arc<MockBackend>, Arc<MemoryTokenStore>) {
    let backend = Arc::new(backend);
    let store = Arc::new(store);
    (SessionValidator::new(backend.clone(), store.clone()), backend, store)
}

fn jwt_with_exp(exp: i64) -> String {
    let claims = json!({ "userId": "1", "email": "demo@example.com", "iat": exp - 60, "exp": exp });
    jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap()
}

#[tokio::test]
async fn empty_store_skips_backend() {
    let (validator, backend, _store) = validator_with(MockBackend::new(), MemoryTokenStore::new());
    assert_eq!(validator.validate().await, None);
    assert_eq!(backend.profiles(), 0);
}

#[tokio::test]
async fn valid_token_returns_backend_user() {
    let backend = MockBackend::new();
    backend.push_profile(Ok(demo_user()));
    let (validator, backend, store) = validator_with(backend, MemoryTokenStore::with_session("tok", demo_user()));

    assert_eq!(validator.validate().await, Some(demo_user()));
    assert_eq!(backend.seen_tokens.lock().unwrap().as_slice(), ["tok".to_owned()]);
    assert_eq!(store.token().as_deref(), Some("tok"));
}

#[tokio::test]
async fn rejected_token_clears_store() {
    let backend = MockBackend::new();
    backend.push_profile(Err(unauthorized("Invalid token")));
    let (validator, _backend, store) = validator_with(backend, MemoryTokenStore::with_session("stale", demo_user()));

    assert_eq!(validator.validate().await, None);
    assert_eq!(store.token(), None);
    assert_eq!(store.cached_user(), None);
}

#[tokio::test]
async fn network_failure_also_clears_store() {
    let backend = MockBackend::new();
    backend.push_profile(Err(AuthError::Network("connection refused".into())));
    let (validator, _backend, store) = validator_with(backend, MemoryTokenStore::with_session("tok", demo_user()));

    assert_eq!(validator.validate().await, None);
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn locally_expired_jwt_is_dropped_without_a_request() {
    let token = jwt_with_exp(jwt::now_unix() - 10);
    let (validator, backend, store) = validator_with(MockBackend::new(), MemoryTokenStore::with_session(token, demo_user()));

    assert_eq!(validator.validate().await, None);
    assert_eq!(backend.profiles(), 0);
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn unexpired_jwt_still_goes_to_backend() {
    let token = jwt_with_exp(jwt::now_unix() + 3_600);
    let backend = MockBackend::new();
    backend.push_profile(Ok(demo_user()));
    let (validator, backend, _store) = validator_with(backend, MemoryTokenStore::with_session(token, demo_user()));

    assert_eq!(validator.validate().await, Some(demo_user()));
    assert_eq!(backend.profiles(), 1);
}

#[tokio::test]
async fn token_replaced_mid_validation_is_kept() {
    let (backend, gate) = MockBackend::gated();
    backend.push_profile(Err(unauthorized("Invalid token")));
    let (validator, _backend, store) = validator_with(backend, MemoryTokenStore::with_session("old", demo_user()));

    let (result, ()) = tokio::join!(validator.validate(), async {
        store.set("new", &demo_user()).unwrap();
        gate.notify_one();
    });

    assert_eq!(result, None);
    assert_eq!(store.token().as_deref(), Some("new"));
}
