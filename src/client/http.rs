//! Reqwest-based HTTP client for chat webhook delivery.
//!
//! Sends one JSON POST per call and folds every failure (connection,
//! timeout, non-2xx status) into `GatewayError::Transport`.

use crate::GatewayError;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;

/// Longest response body excerpt carried into error messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for outbound webhook POSTs.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    timeout: Duration,
}

impl WebhookClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(build_user_agent())
            .build()
            .map_err(|e| GatewayError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST a JSON body to `url`.
    ///
    /// Returns the 2xx status code on success.
    ///
    /// # Errors
    /// * `Transport` - connection failure, timeout, or non-2xx response
    pub async fn post_json(&self, url: &Url, body: Bytes) -> Result<u16, GatewayError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Transport(format!("request timed out after {:?}", self.timeout))
                } else if e.is_connect() {
                    GatewayError::Transport(format!("connection failed: {}", e))
                } else {
                    GatewayError::Transport(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(status.as_u16());
        }

        let body = response.text().await.unwrap_or_default();
        let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        Err(GatewayError::Transport(if excerpt.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("HTTP {}: {}", status.as_u16(), excerpt)
        }))
    }
}

/// Build the User-Agent string sent with every delivery.
///
/// Format: `keyrelay/<version>`
pub fn build_user_agent() -> String {
    format!("keyrelay/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, path: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), path)).unwrap()
    }

    #[test]
    fn test_build_user_agent() {
        let ua = build_user_agent();
        assert_eq!(ua, format!("keyrelay/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_client_creation() {
        let client = WebhookClient::new(Duration::from_secs(5)).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/hook"))
            .and(matchers::header("content-type", "application/json"))
            .and(matchers::body_string(r#"{"content":"hi"}"#))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = WebhookClient::new(DEFAULT_TIMEOUT).unwrap();
        let status = client
            .post_json(&url(&server, "/hook"), Bytes::from_static(br#"{"content":"hi"}"#))
            .await
            .unwrap();
        assert_eq!(status, 204);
    }

    #[tokio::test]
    async fn test_post_json_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad embed"))
            .mount(&server)
            .await;

        let client = WebhookClient::new(DEFAULT_TIMEOUT).unwrap();
        let result = client
            .post_json(&url(&server, "/hook"), Bytes::from_static(b"{}"))
            .await;

        match result {
            Err(GatewayError::Transport(message)) => {
                assert!(message.contains("400"));
                assert!(message.contains("bad embed"));
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let client = WebhookClient::new(Duration::from_millis(200)).unwrap();
        let result = client
            .post_json(&url(&server, "/hook"), Bytes::from_static(b"{}"))
            .await;
        match result {
            Err(GatewayError::Transport(message)) => {
                assert_eq!(message, "request timed out after 200ms")
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_json_connection_refused() {
        let client = WebhookClient::new(DEFAULT_TIMEOUT).unwrap();
        let unreachable = Url::parse("http://127.0.0.1:1/hook").unwrap();
        let result = client.post_json(&unreachable, Bytes::from_static(b"{}")).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
