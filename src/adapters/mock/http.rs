//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses or errors and records every request it sees.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// A response with the given status and JSON body.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }

    /// A response with the given status and raw body.
    pub fn raw(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

/// Key for a configured response: method plus URL.
type RouteKey = (String, String);

/// Mock HTTP client for testing.
///
/// Responses are matched on method and URL: exact match first, then the
/// longest registered prefix route, then the default response. Only URLs
/// registered with a trailing `/` act as prefix routes, so a response for
/// `.../messages/1` never answers `.../messages/12` or `.../messages/1/assistant`.
///
/// # Example
///
/// ```ignore
/// use chatdesk::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response("GET", "http://api/threads", MockResponse::json(200, json!([])));
///
/// let response = client.get("http://api/threads", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by method and URL
    responses: Arc<Mutex<HashMap<RouteKey, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Whether `pattern` is a prefix route (trailing `/`) covering `url`.
fn is_prefix_route(pattern: &str, url: &str) -> bool {
    pattern.ends_with('/') && url.starts_with(pattern)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a method and URL.
    pub fn set_response(&self, method: &str, url: &str, response: MockResponse) {
        lock(&self.responses).insert((method.to_ascii_uppercase(), url.to_string()), response);
    }

    /// Set a default response for requests without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
        *lock(&self.default_response) = None;
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(&(method.to_string(), url.to_string())) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|((m, pattern), _)| m == method && is_prefix_route(pattern, url))
            .max_by_key(|((_, pattern), _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        lock(&self.default_response).clone()
    }

    fn respond(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        match self.get_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.respond("GET", url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.respond("POST", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_http_client_new() {
        let client = MockHttpClient::new();
        assert!(client.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_with_response() {
        let client = MockHttpClient::new();
        client.set_response("GET", "http://api/threads", MockResponse::raw(200, "[]"));

        let response = client.get("http://api/threads", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Bytes::from("[]"));

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "http://api/threads");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_match() {
        let client = MockHttpClient::new();
        client.set_response("GET", "http://api/threads", MockResponse::raw(200, "[]"));

        let result = client.post("http://api/threads", "{}", &Headers::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_post_records_body() {
        let client = MockHttpClient::new();
        client.set_response("POST", "http://api/messages/1", MockResponse::raw(201, "{}"));

        client
            .post("http://api/messages/1", r#"{"text":"hi"}"#, &Headers::new())
            .await
            .unwrap();

        let request = &client.get_requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.json_body(), Some(serde_json::json!({"text": "hi"})));
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("POST", "http://api/messages/", MockResponse::raw(201, "short"));
        client.set_response("POST", "http://api/messages/1/", MockResponse::raw(201, "long"));

        let response = client
            .post("http://api/messages/1/assistant", "{}", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.body, Bytes::from("long"));
    }

    #[tokio::test]
    async fn test_exact_route_does_not_answer_longer_urls() {
        let client = MockHttpClient::new();
        client.set_response("POST", "http://api/messages/1", MockResponse::raw(201, "one"));

        for url in ["http://api/messages/12", "http://api/messages/1/assistant"] {
            let result = client.post(url, "{}", &Headers::new()).await;
            assert!(result.is_err(), "{} should not match", url);
        }

        let response = client
            .post("http://api/messages/1", "{}", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.body, Bytes::from("one"));
    }

    #[tokio::test]
    async fn test_prefix_route_answers_urls_below_it() {
        let client = MockHttpClient::new();
        client.set_response("GET", "http://api/messages/", MockResponse::raw(200, "[]"));

        let response = client.get("http://api/messages/12", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(client.get("http://api/messagesx", &Headers::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_error_and_default_responses() {
        let client = MockHttpClient::new();
        client.set_response(
            "GET",
            "http://api/down",
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );
        client.set_default_response(MockResponse::raw(404, "nope"));

        let err = client.get("http://api/down", &Headers::new()).await.unwrap_err();
        assert!(matches!(err, HttpError::ConnectionFailed(_)));

        let response = client.get("http://api/other", &Headers::new()).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let err = client.get("http://api/threads", &Headers::new()).await.unwrap_err();
        assert!(err.to_string().contains("No mock response"));
    }

    #[tokio::test]
    async fn test_clear() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::raw(200, ""));
        client.get("http://api/x", &Headers::new()).await.unwrap();

        client.clear_requests();
        client.clear_responses();

        assert_eq!(client.request_count(), 0);
        assert!(client.get("http://api/x", &Headers::new()).await.is_err());
    }
}
