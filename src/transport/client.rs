//! reqwest-backed [`Transport`] implementation.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{RequestOptions, Transport, TransportError};

/// HTTP transport wrapping a [`reqwest::Client`].
///
/// Issues exactly one request per call; connection reuse is whatever the
/// inner client provides.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a transport wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    fn apply_options(mut request: RequestBuilder, options: RequestOptions) -> RequestBuilder {
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        request = request.timeout(options.timeout);
        if let Some(params) = &options.params {
            request = request.query(params);
        }
        request
    }

    async fn execute(request: RequestBuilder) -> Result<Value, TransportError> {
        let response = request.send().await.map_err(send_error)?;

        let status = response.status();
        let body = read_body(response).await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::status(status.as_u16(), body))
        }
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[tracing::instrument(skip(self, options))]
    async fn get(&self, url: &str, options: RequestOptions) -> Result<Value, TransportError> {
        debug!("GET {}...", url);
        Self::execute(Self::apply_options(self.client.get(url), options)).await
    }

    #[tracing::instrument(skip(self, body, options))]
    async fn post(
        &self,
        url: &str,
        body: Value,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        debug!("POST {}...", url);
        Self::execute(Self::apply_options(self.client.post(url), options).json(&body)).await
    }

    #[tracing::instrument(skip(self, body, options))]
    async fn put(
        &self,
        url: &str,
        body: Value,
        options: RequestOptions,
    ) -> Result<Value, TransportError> {
        debug!("PUT {}...", url);
        Self::execute(Self::apply_options(self.client.put(url), options).json(&body)).await
    }

    #[tracing::instrument(skip(self, options))]
    async fn delete(&self, url: &str, options: RequestOptions) -> Result<Value, TransportError> {
        debug!("DELETE {}...", url);
        Self::execute(Self::apply_options(self.client.delete(url), options)).await
    }
}

/// Maps a send-phase reqwest error onto the dispatch boundary: builder
/// failures (malformed URL, bad header value) never left the client, anything
/// else (connect, timeout, reset) did.
fn send_error(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::not_sent(error.to_string())
    } else {
        TransportError::no_response(error.to_string())
    }
}

/// Reads the response body, passing it through untouched: JSON parses to the
/// corresponding value, anything else stays a string, empty becomes null.
async fn read_body(response: Response) -> Result<Value, TransportError> {
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::no_response(e.to_string()))?;

    if text.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
