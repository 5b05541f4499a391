//! The API client: request shaping and failure normalization.

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::transport::{HttpClient, RequestOptions, Transport};

/// Stateless-per-call client for a bearer-token JSON API.
///
/// Owns a base URL and an API key; every verb method targets
/// `<base_url>/<path>`, attaches `Authorization: Bearer <key>` and
/// `Content-Type: application/json`, and runs under the configured timeout.
/// Calls are independent: nothing is shared between them beyond the read-only
/// configuration, so concurrent calls on one instance are safe.
pub struct ApiClient<T: Transport = HttpClient> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient {
    /// Creates a client with the default transport and the default 10 second
    /// timeout. The base URL is taken as-is; well-formedness is checked by
    /// the transport at call time.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(base_url, api_key))
    }

    /// Creates a client from an explicit configuration, for the timeout
    /// override.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: HttpClient::new(reqwest::Client::new()),
        }
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client over a caller-provided transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a GET request to `<base_url>/<path>`, optionally with query
    /// parameters, and deserializes the response body. With
    /// `R = serde_json::Value` the body comes back exactly as received.
    #[tracing::instrument(skip(self, params))]
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<R, Error> {
        let url = self.endpoint_url(path);
        debug!("GET {}...", url);

        let body = self
            .transport
            .get(&url, self.options(params))
            .await
            .map_err(Error::from)?;

        decode(body)
    }

    /// Sends a POST request with a JSON payload and deserializes the
    /// response body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, Error> {
        let url = self.endpoint_url(path);
        debug!("POST {}...", url);

        let payload = encode(body)?;
        let body = self
            .transport
            .post(&url, payload, self.options(None))
            .await
            .map_err(Error::from)?;

        decode(body)
    }

    /// Sends a PUT request with a JSON payload and deserializes the response
    /// body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, Error> {
        let url = self.endpoint_url(path);
        debug!("PUT {}...", url);

        let payload = encode(body)?;
        let body = self
            .transport
            .put(&url, payload, self.options(None))
            .await
            .map_err(Error::from)?;

        decode(body)
    }

    /// Sends a DELETE request and deserializes the response body.
    #[tracing::instrument(skip(self))]
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, Error> {
        let url = self.endpoint_url(path);
        debug!("DELETE {}...", url);

        let body = self
            .transport
            .delete(&url, self.options(None))
            .await
            .map_err(Error::from)?;

        decode(body)
    }

    /// Joins the base URL and a relative path with a single slash. No
    /// normalization, no percent-encoding.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Recomputed per call from the configuration.
    fn headers(&self) -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.config.api_key),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    fn options(&self, params: Option<&[(&str, &str)]>) -> RequestOptions {
        RequestOptions {
            headers: self.headers(),
            timeout: self.config.timeout,
            params: params.map(|pairs| {
                pairs
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            }),
        }
    }
}

/// Serializes a request payload. Failure here means the request was never
/// dispatched.
fn encode<B: Serialize>(body: &B) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::Request {
        message: e.to_string(),
    })
}

/// Deserializes a response body into the caller's type. A mismatch is a
/// client-side failure, not a transport one, so it lands in the catch-all
/// kind.
fn decode<R: DeserializeOwned>(body: Value) -> Result<R, Error> {
    serde_json::from_value(body).map_err(|e| Error::Request {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use serde_json::json;
    use std::time::Duration;

    fn config() -> ClientConfig {
        ClientConfig::new("https://api.example.com", "test-api-key")
    }

    fn expected_headers() -> Vec<(String, String)> {
        vec![
            (
                "Authorization".to_string(),
                "Bearer test-api-key".to_string(),
            ),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    #[tokio::test]
    async fn test_get_shapes_url_headers_and_timeout() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|url, options| {
                url == "https://api.example.com/test"
                    && options.headers
                        == vec![
                            (
                                "Authorization".to_string(),
                                "Bearer test-api-key".to_string(),
                            ),
                            ("Content-Type".to_string(), "application/json".to_string()),
                        ]
                    && options.timeout == Duration::from_millis(10_000)
                    && options.params.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(json!("test")));

        let client = ApiClient::with_transport(config(), transport);
        let body: Value = client.get("test", None).await.unwrap();
        assert_eq!(body, json!("test"));
    }

    #[tokio::test]
    async fn test_get_forwards_params() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .withf(|_, options| {
                options.params
                    == Some(vec![
                        ("page".to_string(), "1".to_string()),
                        ("sort".to_string(), "asc".to_string()),
                    ])
            })
            .returning(|_, _| Ok(Value::Null));

        let client = ApiClient::with_transport(config(), transport);
        let _: Value = client
            .get("test", Some(&[("page", "1"), ("sort", "asc")]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_post_forwards_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .withf(|url, body, options| {
                url == "https://api.example.com/test"
                    && *body == json!({"key": "value"})
                    && options.timeout == Duration::from_millis(10_000)
            })
            .returning(|_, _, _| Ok(json!("created")));

        let client = ApiClient::with_transport(config(), transport);
        let body: String = client.post("test", &json!({"key": "value"})).await.unwrap();
        assert_eq!(body, "created");
    }

    #[tokio::test]
    async fn test_put_forwards_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_put()
            .withf(|url, body, _| {
                url == "https://api.example.com/test" && *body == json!({"key": "value"})
            })
            .returning(|_, _, _| Ok(json!("updated")));

        let client = ApiClient::with_transport(config(), transport);
        let body: String = client.put("test", &json!({"key": "value"})).await.unwrap();
        assert_eq!(body, "updated");
    }

    #[tokio::test]
    async fn test_delete_shapes_request() {
        let mut transport = MockTransport::new();
        transport
            .expect_delete()
            .withf(|url, options| {
                url == "https://api.example.com/test" && options.headers == expected_headers()
            })
            .returning(|_, _| Ok(json!("deleted")));

        let client = ApiClient::with_transport(config(), transport);
        let body: String = client.delete("test").await.unwrap();
        assert_eq!(body, "deleted");
    }

    #[tokio::test]
    async fn test_success_body_passes_through() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Ok(json!({"nested": {"values": [1, 2, 3]}})));

        let client = ApiClient::with_transport(config(), transport);
        let body: Value = client.get("test", None).await.unwrap();
        assert_eq!(body, json!({"nested": {"values": [1, 2, 3]}}));
    }

    #[tokio::test]
    async fn test_api_error_classification() {
        let mut transport = MockTransport::new();
        transport.expect_get().returning(|_, _| {
            Err(TransportError::status(404, json!({"message": "Not found"})))
        });

        let client = ApiClient::with_transport(config(), transport);
        let err = client.get::<Value>("test", None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"API Error: 404 - {"message":"Not found"}"#
        );
    }

    #[tokio::test]
    async fn test_network_error_classification() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Err(TransportError::no_response("Network error")));

        let client = ApiClient::with_transport(config(), transport);
        let err = client.get::<Value>("test", None).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Network Error: No response received - Network error"
        );
    }

    #[tokio::test]
    async fn test_request_error_classification() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Err(TransportError::not_sent("Configuration error")));

        let client = ApiClient::with_transport(config(), transport);
        let err = client.get::<Value>("test", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Request Error: Configuration error");
    }

    #[tokio::test]
    async fn test_unserializable_payload_never_reaches_transport() {
        // A map with non-string keys fails serde_json at encode time.
        let mut map = std::collections::HashMap::new();
        map.insert(vec![1u8], "value");

        let transport = MockTransport::new();
        let client = ApiClient::with_transport(config(), transport);
        let err = client.post::<_, Value>("test", &map).await.unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
    }

    #[tokio::test]
    async fn test_mismatched_response_type_is_request_error() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .returning(|_, _| Ok(json!({"name": "test"})));

        let client = ApiClient::with_transport(config(), transport);
        let err = client.get::<Vec<String>>("test", None).await.unwrap_err();
        assert!(matches!(err, Error::Request { .. }));
    }

    #[tokio::test]
    async fn test_instance_usable_after_failure() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(2)
            .returning(|url, _| {
                if url.ends_with("/bad") {
                    Err(TransportError::status(500, Value::Null))
                } else {
                    Ok(json!("ok"))
                }
            });

        let client = ApiClient::with_transport(config(), transport);
        assert!(client.get::<Value>("bad", None).await.is_err());
        let body: String = client.get("good", None).await.unwrap();
        assert_eq!(body, "ok");
    }
}
