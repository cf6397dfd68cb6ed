//! HTTP implementation of [`ChatApi`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{routes, simulated};
use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateThreadRequest, Message, SendMessageRequest, Thread, ThreadId};
use crate::traits::{json_headers, ChatApi, HttpClient, HttpError, Response};

/// Longest slice of an error body kept in [`ApiError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the chat backend.
///
/// Sends and receives JSON against `config.base_url` (or a matching proxy
/// target). Failures are logged and returned unchanged.
///
/// In mock mode `send_message` and `create_thread` never touch the network;
/// they return locally synthesized records instead.
pub struct ChatApiClient<C: HttpClient = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl ChatApiClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest, configured from `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self::with_http(config, http))
    }
}

impl<C: HttpClient> ChatApiClient<C> {
    /// Create a client over an arbitrary transport.
    pub fn with_http(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn is_mock_mode(&self) -> bool {
        self.config.mock_mode
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        resource: Option<String>,
    ) -> ApiResult<T> {
        let url = self.config.url_for(path);
        tracing::debug!(operation, url = %url, "GET");

        let result = match self.http.get(&url, &json_headers()).await {
            Ok(response) => decode(response, resource),
            Err(err) => Err(err.into()),
        };
        log_failure(operation, &url, result)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
        resource: Option<String>,
    ) -> ApiResult<T> {
        let url = self.config.url_for(path);
        tracing::debug!(operation, url = %url, "POST");

        let result = match serde_json::to_string(body) {
            Ok(body) => match self.http.post(&url, &body, &json_headers()).await {
                Ok(response) => decode(response, resource),
                Err(err) => Err(err.into()),
            },
            Err(err) => Err(ApiError::Encode {
                message: err.to_string(),
            }),
        };
        log_failure(operation, &url, result)
    }
}

/// Turn a raw response into `T`, mapping non-2xx statuses to errors.
fn decode<T: DeserializeOwned>(response: Response, resource: Option<String>) -> ApiResult<T> {
    if response.is_success() {
        return Ok(response.json()?);
    }

    match (response.status, resource) {
        (404, Some(resource)) => Err(ApiError::NotFound { resource }),
        (status, _) => Err(ApiError::Status {
            status,
            message: response.text_lossy().chars().take(ERROR_BODY_LIMIT).collect(),
        }),
    }
}

fn log_failure<T>(operation: &'static str, url: &str, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(ref err) = result {
        tracing::error!(
            operation,
            url,
            code = err.error_code(),
            error = %err,
            "API call failed"
        );
    }
    result
}

#[async_trait]
impl<C: HttpClient> ChatApi for ChatApiClient<C> {
    async fn list_threads(&self) -> ApiResult<Vec<Thread>> {
        self.get_json("list_threads", routes::THREADS, None).await
    }

    async fn get_thread(&self, id: ThreadId) -> ApiResult<Thread> {
        self.get_json("get_thread", &routes::thread(id), Some(format!("thread {}", id)))
            .await
    }

    async fn list_messages(&self, thread_id: ThreadId) -> ApiResult<Vec<Message>> {
        self.get_json(
            "list_messages",
            &routes::messages(thread_id),
            Some(format!("thread {}", thread_id)),
        )
        .await
    }

    async fn send_message(&self, thread_id: ThreadId, text: &str) -> ApiResult<Message> {
        if self.config.mock_mode {
            tracing::debug!(thread_id, "mock mode: synthesizing user message");
            return Ok(simulated::user_message(text));
        }
        self.post_json(
            "send_message",
            &routes::messages(thread_id),
            &SendMessageRequest::new(text),
            Some(format!("thread {}", thread_id)),
        )
        .await
    }

    async fn send_assistant_message(&self, thread_id: ThreadId, text: &str) -> ApiResult<Message> {
        self.post_json(
            "send_assistant_message",
            &routes::assistant_messages(thread_id),
            &SendMessageRequest::new(text),
            Some(format!("thread {}", thread_id)),
        )
        .await
    }

    async fn create_thread(&self, title: &str, first_message: &str) -> ApiResult<Thread> {
        if self.config.mock_mode {
            tracing::debug!(title, "mock mode: synthesizing thread");
            return Ok(simulated::thread(title, first_message));
        }
        self.post_json(
            "create_thread",
            routes::THREADS,
            &CreateThreadRequest::new(title, first_message),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::models::Sender;
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn client(mock_mode: bool) -> ChatApiClient<MockHttpClient> {
        let config = ClientConfig::default()
            .with_base_url(BASE)
            .with_mock_mode(mock_mode);
        ChatApiClient::with_http(config, MockHttpClient::new())
    }

    fn thread_json(id: i64, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "messages": [{"id": 1, "text": "hi", "sender": "user", "timestamp": 1000}],
            "createdAt": 1000,
            "updatedAt": 1000,
            "isActive": true
        })
    }

    #[tokio::test]
    async fn test_list_threads() {
        let api = client(false);
        api.http().set_response(
            "GET",
            "http://api.test/threads",
            MockResponse::json(200, json!([thread_json(1, "a"), thread_json(2, "b")])),
        );

        let threads = api.list_threads().await.unwrap();
        assert_eq!(threads.len(), 2);
        assert_eq!(threads[1].title, "b");

        let request = &api.http().get_requests()[0];
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_get_thread_not_found() {
        let api = client(false);
        api.http().set_response(
            "GET",
            "http://api.test/threads/99",
            MockResponse::json(404, json!({"detail": "Thread not found"})),
        );

        let err = api.get_thread(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_threads_server_error_keeps_status() {
        let api = client(false);
        api.http()
            .set_response("GET", "http://api.test/threads", MockResponse::raw(500, "boom"));

        let err = api.list_threads().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_threads_401_is_status_not_not_found() {
        let api = client(false);
        api.http()
            .set_response("GET", "http://api.test/threads", MockResponse::raw(401, "login"));
        assert_eq!(api.list_threads().await.unwrap_err().status(), Some(401));
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let api = client(false);
        api.http()
            .set_response("GET", "http://api.test/messages/3", MockResponse::raw(200, "{oops"));

        let err = api.list_messages(3).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through_unchanged() {
        let api = client(false);
        let transport = HttpError::ConnectionFailed("refused".to_string());
        api.http().set_response(
            "GET",
            "http://api.test/threads",
            MockResponse::Error(transport.clone()),
        );

        let err = api.list_threads().await.unwrap_err();
        assert_eq!(err, ApiError::Transport(transport));
    }

    #[tokio::test]
    async fn test_send_message_posts_text() {
        let api = client(false);
        api.http().set_response(
            "POST",
            "http://api.test/messages/5",
            MockResponse::json(201, json!({"id": 10, "text": "hello", "sender": "user", "timestamp": 5})),
        );

        let message = api.send_message(5, "hello").await.unwrap();
        assert_eq!(message.id, 10);
        assert_eq!(message.sender, Sender::User);

        let request = &api.http().get_requests()[0];
        assert_eq!(request.json_body(), Some(json!({"text": "hello"})));
    }

    #[tokio::test]
    async fn test_send_assistant_message_uses_assistant_route() {
        let api = client(false);
        api.http().set_response(
            "POST",
            "http://api.test/messages/5/assistant",
            MockResponse::json(
                201,
                json!({"id": 11, "text": "reply", "sender": "assistant", "timestamp": 6}),
            ),
        );

        let message = api.send_assistant_message(5, "reply").await.unwrap();
        assert_eq!(message.sender, Sender::Assistant);
        assert_eq!(api.http().get_requests()[0].url, "http://api.test/messages/5/assistant");
    }

    #[tokio::test]
    async fn test_create_thread_posts_snake_case_body() {
        let api = client(false);
        api.http().set_response(
            "POST",
            "http://api.test/threads",
            MockResponse::json(201, thread_json(4, "T")),
        );

        let thread = api.create_thread("T", "hi").await.unwrap();
        assert_eq!(thread.id, 4);
        assert_eq!(
            api.http().get_requests()[0].json_body(),
            Some(json!({"title": "T", "first_message": "hi"}))
        );
    }

    #[tokio::test]
    async fn test_mock_mode_skips_network_for_send_and_create() {
        let api = client(true);

        let message = api.send_message(1, "hello").await.unwrap();
        assert_eq!(message.text, "hello");
        assert_eq!(message.sender, Sender::User);

        let thread = api.create_thread("T", "first").await.unwrap();
        assert_eq!(thread.title, "T");
        assert_eq!(thread.messages[0].text, "first");

        assert_eq!(api.http().request_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_mode_still_lists_over_network() {
        let api = client(true);
        api.http()
            .set_response("GET", "http://api.test/threads", MockResponse::json(200, json!([])));

        assert!(api.list_threads().await.unwrap().is_empty());
        assert_eq!(api.http().request_count(), 1);
    }

    #[tokio::test]
    async fn test_proxy_rule_redirects_matching_paths() {
        let config = ClientConfig::default()
            .with_base_url(BASE)
            .with_proxy_rule("/messages", "http://proxy.test");
        let api = ChatApiClient::with_http(config, MockHttpClient::new());
        api.http()
            .set_response("GET", "http://proxy.test/messages/2", MockResponse::json(200, json!([])));

        assert!(api.list_messages(2).await.unwrap().is_empty());
    }

    #[test]
    fn test_error_body_is_truncated_on_char_boundary() {
        let body = "é".repeat(500);
        let response = Response::new(502, bytes::Bytes::from(body));
        let err = decode::<Vec<Thread>>(response, None).unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.chars().count(), ERROR_BODY_LIMIT);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
