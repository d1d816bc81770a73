//! HS256 access tokens.
//!
//! Claims mirror what the session crate reads locally: `userId`, `email`,
//! `iat`, and `exp` (Unix seconds). Expiry is checked with zero leeway.

use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid(jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `user_id` valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        let iat = time::OffsetDateTime::now_utc().unix_timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        self.issue_at(user_id, email, iat, iat.saturating_add(ttl))
    }

    pub(crate) fn issue_at(&self, user_id: &str, email: &str, iat: i64, exp: i64) -> Result<String, TokenError> {
        let claims = Claims { user_id: user_id.to_owned(), email: email.to_owned(), iat, exp };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Sign)
    }

    /// Check signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for tampered, foreign, or expired tokens.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
