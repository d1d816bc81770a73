use super::*;

fn demo_user() -> User {
    User::basic("1", "demo@example.com", "Demo User")
}

#[test]
fn new_store_is_empty() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.token(), None);
    assert_eq!(store.cached_user(), None);
}

#[test]
fn set_then_read_back() {
    let store = MemoryTokenStore::new();
    store.set("tok", &demo_user()).expect("set");
    assert_eq!(store.token().as_deref(), Some("tok"));
    assert_eq!(store.cached_user(), Some(demo_user()));
}

#[test]
fn set_replaces_previous_session() {
    let store = MemoryTokenStore::with_session("old", demo_user());
    let other = User::basic("2", "b@example.com", "B");
    store.set("new", &other).expect("set");
    assert_eq!(store.token().as_deref(), Some("new"));
    assert_eq!(store.cached_user(), Some(other));
}

#[test]
fn clear_is_idempotent() {
    let store = MemoryTokenStore::with_session("tok", demo_user());
    store.clear().expect("clear");
    store.clear().expect("clear again");
    assert_eq!(store.token(), None);
    assert_eq!(store.cached_user(), None);
}

#[test]
fn clear_if_only_clears_matching_token() {
    let store = MemoryTokenStore::with_session("new", demo_user());
    assert!(!store.clear_if("old").expect("clear_if"));
    assert_eq!(store.token().as_deref(), Some("new"));

    assert!(store.clear_if("new").expect("clear_if"));
    assert_eq!(store.token(), None);
    assert!(!store.clear_if("new").expect("clear_if on empty store"));
}

#[test]
fn clear_if_never_wipes_a_concurrent_set() {
    for _ in 0..200 {
        let store = std::sync::Arc::new(MemoryTokenStore::with_session("old", demo_user()));
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || store.set("new", &demo_user()).expect("set"))
        };
        let _ = store.clear_if("old").expect("clear_if");
        writer.join().expect("writer thread");
        assert_eq!(store.token().as_deref(), Some("new"));
    }
}
