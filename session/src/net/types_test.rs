use super::*;

#[test]
fn user_profile_maps_email_to_id_and_fullname_to_name() {
    let profile: UserProfile = serde_json::from_value(serde_json::json!({
        "email": "ada@example.com",
        "fullname": "Ada Lovelace",
        "avatar": null,
        "dob": "1815-12-10",
        "is_verified": true,
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .expect("profile");
    let user = User::from(profile);
    assert_eq!(user.id, "ada@example.com");
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.avatar, None);
    assert_eq!(user.dob.as_deref(), Some("1815-12-10"));
    assert_eq!(user.is_verified, Some(true));
}

#[test]
fn mock_tokens_decode_into_basic_user() {
    let tokens: MockAuthTokens = serde_json::from_value(serde_json::json!({
        "token": "abc",
        "user": {"id": "1", "email": "demo@example.com", "name": "Demo User"}
    }))
    .expect("tokens");
    assert_eq!(tokens.token, "abc");
    assert_eq!(User::from(tokens.user), User::basic("1", "demo@example.com", "Demo User"));
}

#[test]
fn basic_user_serializes_without_profile_fields() {
    let json = serde_json::to_value(User::basic("1", "a@b.co", "A")).expect("json");
    assert_eq!(json, serde_json::json!({"id": "1", "email": "a@b.co", "name": "A"}));
}

#[test]
fn account_signup_request_omits_absent_optional_fields() {
    let req = AccountSignupRequest {
        email: "a@b.co",
        password: "longenough",
        fullname: "A",
        avatar: None,
        dob: Some("2000-01-01"),
    };
    let json = serde_json::to_value(&req).expect("json");
    assert!(json.get("avatar").is_none());
    assert_eq!(json["dob"], "2000-01-01");
}

#[test]
fn signin_response_defaults_token_type() {
    let resp: SigninResponse = serde_json::from_value(serde_json::json!({
        "access_token": "t",
        "expires_in": 60,
        "email": "a@b.co"
    }))
    .expect("signin");
    assert_eq!(resp.token_type, "bearer");
}

#[test]
fn ack_tolerates_missing_message() {
    let ack: Ack = serde_json::from_value(serde_json::json!({})).expect("ack");
    assert_eq!(ack.message, "");
    assert_eq!(ack.reset_token, None);
}
