//! Shared HTTP plumbing for the backend adapters.
//!
//! One request per call, no retries. Non-2xx bodies are read as text first so
//! both error dialects can be normalized by [`AuthError::from_response`].

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::error::AuthError;

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client rooted at `base_url`. Without a `timeout` the transport
    /// default applies.
    pub(crate) fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AuthError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    /// Send `req` and decode a JSON success body into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, fallback: &str) -> Result<T, AuthError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err = AuthError::from_response(status.as_u16(), &body, fallback);
            if status.is_server_error() {
                tracing::error!(status = status.as_u16(), body = %body, "auth backend server error");
            } else {
                tracing::debug!(status = status.as_u16(), error = %err, "auth backend rejected request");
            }
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}
