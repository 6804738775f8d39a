//! Transport contract between the sync logic and the HTTP layer.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{Result, SyncError};

/// HTTP verbs used against the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single call against the remote API.
///
/// `path` may be relative to the API endpoint or already carry it (links
/// returned by the API are absolute); the transport normalizes both.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<Value>,
    /// Send the admin-mode header
    pub admin: bool,
    /// Wait this long before issuing the call
    pub pre_delay: Duration,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), payload: None, admin: false, pre_delay: Duration::ZERO }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_payload(payload)
    }

    pub fn put(path: impl Into<String>, payload: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_payload(payload)
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }

    #[must_use]
    pub fn with_pre_delay(mut self, delay: Duration) -> Self {
        self.pre_delay = delay;
        self
    }
}

/// Status and decoded body of a completed call. Non-2xx statuses are not
/// errors at this level.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    pub const fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Decode the body into a typed response.
    ///
    /// # Errors
    /// Returns `SyncError::MalformedResponse` when a required field is missing
    /// or has the wrong type.
    pub fn parse<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| SyncError::malformed(endpoint, e))
    }

    /// Compact rendering of the body for log lines and error details.
    pub fn body_summary(&self) -> String {
        const MAX: usize = 512;
        let rendered = self.body.to_string();
        if rendered.len() <= MAX {
            return rendered;
        }
        let mut cut = MAX;
        while !rendered.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &rendered[..cut])
    }
}
