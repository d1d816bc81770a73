use super::*;

#[test]
fn recording_navigator_keeps_order() {
    let nav = RecordingNavigator::new();
    nav.navigate("/dashboard");
    nav.navigate("/");
    assert_eq!(nav.paths(), vec!["/dashboard".to_owned(), "/".to_owned()]);
    assert_eq!(nav.last().as_deref(), Some("/"));
}

#[test]
fn closures_are_navigators() {
    let seen = Mutex::new(Vec::new());
    let nav = |path: &str| seen.lock().expect("lock").push(path.to_owned());
    nav.navigate("/auth/signin");
    assert_eq!(seen.lock().expect("lock").as_slice(), ["/auth/signin".to_owned()]);
}
