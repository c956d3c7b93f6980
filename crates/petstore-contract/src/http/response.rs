//! HTTP response handling

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;

use crate::error::{Error, Result};

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    elapsed: Duration,
}

impl ApiResponse {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>, elapsed: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            elapsed,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the body as text. Invalid UTF-8 is replaced, never rejected.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Parse the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ResponseDecode` if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::ResponseDecode(e.to_string()))
    }

    /// Parse the body as an untyped JSON value.
    pub fn json_value(&self) -> Result<Value> {
        self.json()
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Time taken from sending the request to buffering the body.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
