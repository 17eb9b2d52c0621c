//! Mock Cupid client for testing and local development.
//!
//! The `MockCupidClient` is pre-populated with path → response mappings,
//! allowing the sync to run without network access. Responses go through
//! the same status classification as the live client.
//!
//! # Example
//!
//! ```ignore
//! use cupid_client::{MockCupidClient, MockResponse, CupidFetcher};
//!
//! let client = MockCupidClient::new();
//! client.register("/v3.0/property/1641879", MockResponse::ok(property_json));
//! client.register("/v3.0/property/42", MockResponse::status(500));
//!
//! let body = client.fetch(Method::GET, "/v3.0/property/1641879", &headers).await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::status::classify_response;
use crate::{CupidFetcher, Result};

/// A canned response served by [`MockCupidClient`].
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: Bytes,
    pub request_id: Option<String>,
}

impl MockResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            request_id: None,
        }
    }

    /// An empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Bytes::new(),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// A request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
}

/// Mock Cupid client that returns pre-configured responses.
///
/// Unregistered paths answer 404.
pub struct MockCupidClient {
    responses: RwLock<HashMap<String, MockResponse>>,
    requests: RwLock<Vec<RecordedRequest>>,
}

impl MockCupidClient {
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            requests: RwLock::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: HashMap<String, MockResponse>) -> Self {
        Self {
            responses: RwLock::new(responses),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Register (or replace) the response for a path.
    pub fn register(&self, path: &str, response: MockResponse) {
        self.responses
            .write()
            .unwrap()
            .insert(path.to_string(), response);
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.responses.read().unwrap().contains_key(path)
    }

    /// Requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

impl Default for MockCupidClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CupidFetcher for MockCupidClient {
    async fn fetch(&self, method: Method, path: &str, headers: &HeaderMap) -> Result<Bytes> {
        let api_key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.write().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            api_key,
        });

        let response = self
            .responses
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_else(|| MockResponse::status(404));

        classify_response(response.status, response.request_id, response.body)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;
    use crate::CupidError;

    #[tokio::test]
    async fn test_mock_serves_registered_body() {
        let client = MockCupidClient::new();
        client.register("/v3.0/property/1", MockResponse::ok(r#"{"hotel_id":1}"#));

        let body = client
            .fetch(Method::GET, "/v3.0/property/1", &HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(body.as_ref(), br#"{"hotel_id":1}"#);
    }

    #[tokio::test]
    async fn test_mock_classifies_error_status() {
        let client = MockCupidClient::new();
        client.register(
            "/v3.0/property/2",
            MockResponse::status(503).with_request_id("req-503"),
        );

        let err = client
            .fetch(Method::GET, "/v3.0/property/2", &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(err.is_server_error());
        assert_eq!(err.request_id(), Some("req-503"));
    }

    #[tokio::test]
    async fn test_mock_unknown_path_is_not_found() {
        let client = MockCupidClient::new();
        let err = client
            .fetch(Method::GET, "/v3.0/property/404", &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CupidError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let client = MockCupidClient::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_static("secret"));

        let _ = client.fetch(Method::GET, "/a", &headers).await;
        let _ = client.fetch(Method::GET, "/b", &HeaderMap::new()).await;

        let requests = client.requests();
        assert_eq!(client.request_count(), 2);
        assert_eq!(requests[0].path, "/a");
        assert_eq!(requests[0].api_key.as_deref(), Some("secret"));
        assert_eq!(requests[1].api_key, None);
    }
}
