//! HTTP transport seam.
//!
//! The [`Transport`] trait is the injection point for the actual network
//! layer, enabling substitution with a mock in tests without runtime patching.

mod client;

pub use client::HttpClient;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Per-request options the client attaches to every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Header name/value pairs, sent verbatim.
    pub headers: Vec<(String, String)>,
    /// Hard deadline for the whole request/response exchange.
    pub timeout: Duration,
    /// Query parameters, GET only. `None` appends nothing to the URL.
    pub params: Option<Vec<(String, String)>>,
}

/// A response that arrived with a non-success status.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: Value,
}

/// Failure surfaced by a transport.
///
/// Exactly one of three shapes holds: a response was received (`response` is
/// set, even for non-2xx statuses), the request was dispatched but no
/// response arrived (`dispatched` without `response`), or the request never
/// left the client (neither).
#[derive(Debug)]
pub struct TransportError {
    pub response: Option<ErrorResponse>,
    pub dispatched: bool,
    pub message: String,
}

impl TransportError {
    /// A non-success response was received.
    pub fn status(status: u16, body: Value) -> Self {
        Self {
            message: format!("HTTP status {}", status),
            response: Some(ErrorResponse { status, body }),
            dispatched: true,
        }
    }

    /// The request was sent but no response came back.
    pub fn no_response(message: impl Into<String>) -> Self {
        Self {
            response: None,
            dispatched: true,
            message: message.into(),
        }
    }

    /// The request could not be built or sent at all.
    pub fn not_sent(message: impl Into<String>) -> Self {
        Self {
            response: None,
            dispatched: false,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Verb-level HTTP capability consumed by [`ApiClient`](crate::ApiClient).
///
/// Implementations perform exactly one request per call and report failures
/// as [`TransportError`] values; they never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, options: RequestOptions) -> Result<Value, TransportError>;
    async fn post(
        &self,
        url: &str,
        body: Value,
        options: RequestOptions,
    ) -> Result<Value, TransportError>;
    async fn put(
        &self,
        url: &str,
        body: Value,
        options: RequestOptions,
    ) -> Result<Value, TransportError>;
    async fn delete(&self, url: &str, options: RequestOptions) -> Result<Value, TransportError>;
}
