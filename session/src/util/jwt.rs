//! Local inspection of bearer tokens.
//!
//! The signature is NOT checked here; only the backend can do that. Reading
//! `exp` locally lets the validator drop a token that has plainly expired
//! without a round trip.

#[cfg(test)]
#[path = "jwt_test.rs"]
mod jwt_test;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// The `exp` claim (Unix seconds) of a JWT, or `None` for opaque tokens and
/// JWTs without an expiry.
#[must_use]
pub fn expires_at(token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .and_then(|data| data.claims.exp)
}

/// `true` only when the token is a JWT whose expiry is at or before `now`.
#[must_use]
pub fn is_expired_at(token: &str, now: i64) -> bool {
    expires_at(token).is_some_and(|exp| exp <= now)
}

#[must_use]
pub fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
