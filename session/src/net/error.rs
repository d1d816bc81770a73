//! Auth error model and backend error-body normalization.
//!
//! ERROR HANDLING
//! ==============
//! Views only ever show `AuthError`'s `Display` text. `kind()` lets callers
//! branch (inline field errors vs. banner) without matching on message text.
//! The two backends disagree on error bodies (`{error, message}` vs.
//! `{detail}`); [`message_from_body`] folds both into one message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::fmt;

use serde::Deserialize;

use crate::store::StoreError;

/// A single failed form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Client-side validation failures, one entry per field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Coarse classification of an [`AuthError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Network,
    Server,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error("{message}")]
    Authentication { status: u16, message: String },
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported { operation: &'static str, backend: &'static str },
    #[error("could not save session: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Rejected { .. } => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Network(_) => ErrorKind::Network,
            Self::Server { .. } | Self::Decode(_) | Self::Unsupported { .. } | Self::Store(_) => ErrorKind::Server,
        }
    }

    /// HTTP status that produced this error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Rejected { status, .. } | Self::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Build an error from a non-2xx status and its raw body.
    ///
    /// `fallback` is used when the body carries no recognizable message.
    #[must_use]
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| fallback.to_owned());
        match status {
            401 | 403 => Self::Authentication { status, message },
            400..=499 => Self::Rejected { status, message },
            _ => Self::Server { status, message },
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract a human-readable message from either error body shape.
///
/// Preference order: `detail`, `message`, `error`. A `detail` array (the
/// shape some validation layers emit) contributes its first `msg`.
#[must_use]
pub fn message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let detail = parsed.detail.and_then(|detail| match detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    });
    detail
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}
