//! Notification relay.
//!
//! Forwards opaque JSON payloads to per-channel chat webhooks. A channel
//! without a configured URL fails with `GatewayError::Configuration` before
//! any network activity. Each delivery is a single attempt on its own task,
//! bounded by the client timeout.

pub mod channel;
pub mod payload;

pub use channel::Channel;
pub use payload::RelayPayload;

use crate::client::http::WebhookClient;
use crate::GatewayError;
use reqwest::Url;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{info, warn};

/// Forwards payloads to configured channel endpoints.
#[derive(Debug, Clone)]
pub struct NotificationRelay {
    endpoints: BTreeMap<Channel, Url>,
    client: WebhookClient,
}

impl NotificationRelay {
    /// Create a relay for the given channel endpoints.
    ///
    /// Channels missing from `endpoints` stay unconfigured.
    pub fn new<I>(endpoints: I, timeout: Duration) -> Result<Self, GatewayError>
    where
        I: IntoIterator<Item = (Channel, Url)>,
    {
        Ok(Self {
            endpoints: endpoints.into_iter().collect(),
            client: WebhookClient::new(timeout)?,
        })
    }

    /// Destination for `channel`, if configured.
    pub fn endpoint(&self, channel: Channel) -> Option<&Url> {
        self.endpoints.get(&channel)
    }

    /// Whether `channel` has a destination.
    pub fn is_configured(&self, channel: Channel) -> bool {
        self.endpoints.contains_key(&channel)
    }

    /// Channels with no destination, in discovery order.
    pub fn missing_channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| !self.is_configured(*c))
            .collect()
    }

    /// Forward `payload` to `channel`'s endpoint.
    ///
    /// # Errors
    /// * `Configuration` - the channel has no destination (nothing is sent)
    /// * `Transport` - the delivery failed
    /// * `Internal` - the delivery task panicked or was cancelled
    pub async fn forward(&self, channel: Channel, payload: RelayPayload) -> Result<(), GatewayError> {
        let url = self
            .endpoint(channel)
            .cloned()
            .ok_or(GatewayError::Configuration { channel })?;

        let client = self.client.clone();
        let size = payload.len();
        let delivery =
            tokio::spawn(async move { client.post_json(&url, payload.into_bytes()).await });

        match delivery.await {
            Ok(Ok(status)) => {
                info!(%channel, status, bytes = size, "Webhook forwarded");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(%channel, error = %e, "Webhook delivery failed");
                Err(e)
            }
            Err(e) => Err(GatewayError::Internal(format!("delivery task failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::http::DEFAULT_TIMEOUT;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn payload() -> RelayPayload {
        RelayPayload::from_value(&serde_json::json!({"content": "key verified"})).unwrap()
    }

    #[test]
    fn test_missing_channels() {
        let url = Url::parse("https://discord.example/api/webhooks/1/abc").unwrap();
        let relay =
            NotificationRelay::new([(Channel::DeveloperActivity, url.clone())], DEFAULT_TIMEOUT)
                .unwrap();

        assert!(relay.is_configured(Channel::DeveloperActivity));
        assert_eq!(relay.endpoint(Channel::DeveloperActivity), Some(&url));
        assert_eq!(
            relay.missing_channels(),
            vec![Channel::KeyTracking, Channel::AllActivity]
        );
    }

    #[tokio::test]
    async fn test_forward_unconfigured_channel() {
        let server = MockServer::start().await;
        Mock::given(matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/all", server.uri())).unwrap();
        let relay = NotificationRelay::new([(Channel::AllActivity, url)], DEFAULT_TIMEOUT).unwrap();

        let result = relay.forward(Channel::KeyTracking, payload()).await;
        assert!(matches!(
            result,
            Err(GatewayError::Configuration {
                channel: Channel::KeyTracking
            })
        ));
    }

    #[tokio::test]
    async fn test_forward_delivers_payload_verbatim() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/hooks/key"))
            .and(matchers::body_json(serde_json::json!({"content": "key verified"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/hooks/key", server.uri())).unwrap();
        let relay = NotificationRelay::new([(Channel::KeyTracking, url)], DEFAULT_TIMEOUT).unwrap();

        relay.forward(Channel::KeyTracking, payload()).await.unwrap();
    }

    #[tokio::test]
    async fn test_forward_single_attempt_on_failure() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/hooks/all", server.uri())).unwrap();
        let relay = NotificationRelay::new([(Channel::AllActivity, url)], DEFAULT_TIMEOUT).unwrap();

        let result = relay.forward(Channel::AllActivity, payload()).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }
}
