//! Shared handler state.

use crate::config::GatewayConfig;
use crate::registry::{default_seed_keys, KeyRegistry};
use crate::relay::NotificationRelay;
use crate::GatewayError;
use std::sync::Arc;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Key registry.
    pub registry: Arc<KeyRegistry>,
    /// Webhook relay.
    pub relay: Arc<NotificationRelay>,
}

impl AppState {
    /// Bundle already-built services.
    pub fn new(registry: Arc<KeyRegistry>, relay: Arc<NotificationRelay>) -> Self {
        Self { registry, relay }
    }

    /// Build the registry (seeded with the bootstrap keys) and relay from
    /// configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let registry = KeyRegistry::new(default_seed_keys(), config.tier_policy())?;
        let relay = NotificationRelay::new(config.relay_endpoints()?, config.relay_timeout())?;
        Ok(Self::new(Arc::new(registry), Arc::new(relay)))
    }
}
