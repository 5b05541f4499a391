//! Three-way failure taxonomy and transport-error classification.

use serde_json::Value;

use crate::transport::TransportError;

/// Failure of a single API call.
///
/// Exactly one kind applies to any transport failure: a response arrived with
/// a non-success status, the request went out but nothing came back, or the
/// request never left the client.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A response was received with a non-success status.
    Api { status: u16, body: Value },
    /// The request was dispatched but no response arrived (timeout,
    /// connection reset, DNS failure after dispatch).
    Network { message: String },
    /// The request could not be constructed or sent at all (malformed URL,
    /// serialization failure before send).
    Request { message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Api { status, body } => {
                // serde_json::Value renders compact here, matching the wire
                // form of the body.
                write!(f, "API Error: {} - {}", status, body)
            }
            Error::Network { message } => {
                write!(f, "Network Error: No response received - {}", message)
            }
            Error::Request { message } => {
                write!(f, "Request Error: {}", message)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<TransportError> for Error {
    /// Classifies a transport failure.
    ///
    /// Checked in priority order: response presence first, then the dispatch
    /// marker, then the pre-dispatch fallback. A response-bearing error may
    /// also carry the dispatch marker; the response classification wins.
    fn from(error: TransportError) -> Self {
        if let Some(response) = error.response {
            Error::Api {
                status: response.status,
                body: response.body,
            }
        } else if error.dispatched {
            Error::Network {
                message: error.message,
            }
        } else {
            Error::Request {
                message: error.message,
            }
        }
    }
}
