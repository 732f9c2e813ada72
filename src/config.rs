//! Keyrelay configuration.
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. The unprefixed variables `PORT`, `KEY_TRACKING_WEBHOOK`,
//!    `DEVELOPER_ACTIVITY_WEBHOOK` and `ALL_ACTIVITY_WEBHOOK`
//! 3. A TOML file (`config/default.toml` unless a path is given)
//! 4. `KEYRELAY_*` variables (e.g. `KEYRELAY_LOG_LEVEL=debug`)

use crate::policy::expiry::{TierPolicy, DEFAULT_LIFETIME_TIERS};
use crate::relay::Channel;
use crate::GatewayError;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Upper bound for the relay timeout, in seconds.
pub const MAX_RELAY_TIMEOUT_SECS: u64 = 60;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Configuration for the keyrelay gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Destination for the key-tracking channel.
    pub key_tracking_webhook: Option<String>,

    /// Destination for the developer-activity channel.
    pub developer_activity_webhook: Option<String>,

    /// Destination for the all-activity channel.
    pub all_activity_webhook: Option<String>,

    /// Timeout for a single relay delivery, in seconds.
    pub relay_timeout_secs: u64,

    /// Tiers whose issued keys never expire.
    pub lifetime_tiers: Vec<String>,

    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            key_tracking_webhook: None,
            developer_activity_webhook: None,
            all_activity_webhook: None,
            relay_timeout_secs: 10,
            lifetime_tiers: DEFAULT_LIFETIME_TIERS.iter().map(|t| t.to_string()).collect(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from the process environment and an optional file.
    pub fn load(path: Option<&Path>) -> Result<Self, GatewayError> {
        Self::load_from(path, std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    ///
    /// Without a `path`, `config/default.{toml,...}` is used if present.
    pub fn load_from(path: Option<&Path>, vars: HashMap<String, String>) -> Result<Self, GatewayError> {
        let mut builder = config::Config::builder();

        let legacy = std::iter::once(("port", "PORT")).chain(
            Channel::ALL
                .iter()
                .map(|c| (channel_field(*c), c.env_var())),
        );
        for (field, var) in legacy {
            if let Some(value) = vars.get(var) {
                builder = builder
                    .set_default(field, value.as_str())
                    .map_err(|e| GatewayError::Config(e.to_string()))?;
            }
        }

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let prefixed: HashMap<String, String> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with("KEYRELAY_"))
            .collect();
        builder = builder.add_source(
            config::Environment::with_prefix("KEYRELAY")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("lifetime_tiers")
                .source(Some(prefixed)),
        );

        let config: GatewayConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), GatewayError> {
        self.host.parse::<IpAddr>().map_err(|_| {
            GatewayError::Config(format!("host must be an IP address, got {:?}", self.host))
        })?;
        if self.relay_timeout_secs == 0 || self.relay_timeout_secs > MAX_RELAY_TIMEOUT_SECS {
            return Err(GatewayError::Config(format!(
                "relay_timeout_secs must be between 1 and {}, got {}",
                MAX_RELAY_TIMEOUT_SECS, self.relay_timeout_secs
            )));
        }
        if self.lifetime_tiers.iter().any(|t| t.trim().is_empty()) {
            return Err(GatewayError::Config(
                "lifetime_tiers cannot contain empty labels".to_string(),
            ));
        }
        self.relay_endpoints()?;
        Ok(())
    }

    /// Raw configured URL for `channel`; empty strings count as unset.
    pub fn webhook_url(&self, channel: Channel) -> Option<&str> {
        let url = match channel {
            Channel::KeyTracking => &self.key_tracking_webhook,
            Channel::DeveloperActivity => &self.developer_activity_webhook,
            Channel::AllActivity => &self.all_activity_webhook,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Parsed destinations for every configured channel.
    pub fn relay_endpoints(&self) -> Result<Vec<(Channel, Url)>, GatewayError> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.webhook_url(channel).map(|raw| (channel, raw)))
            .map(|(channel, raw)| {
                let url = Url::parse(raw).map_err(|e| {
                    GatewayError::Config(format!("{} is not a valid URL: {}", channel.env_var(), e))
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(GatewayError::Config(format!(
                        "{} must use http or https",
                        channel.env_var()
                    )));
                }
                Ok((channel, url))
            })
            .collect()
    }

    /// Socket address to bind.
    pub fn socket_addr(&self) -> Result<SocketAddr, GatewayError> {
        let ip = self
            .host
            .parse::<IpAddr>()
            .map_err(|e| GatewayError::Config(format!("invalid host {:?}: {}", self.host, e)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Relay timeout as a `Duration`.
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_secs)
    }

    /// Tier policy built from `lifetime_tiers`.
    pub fn tier_policy(&self) -> TierPolicy {
        TierPolicy::new(self.lifetime_tiers.iter().cloned())
    }
}

fn channel_field(channel: Channel) -> &'static str {
    match channel {
        Channel::KeyTracking => "key_tracking_webhook",
        Channel::DeveloperActivity => "developer_activity_webhook",
        Channel::AllActivity => "all_activity_webhook",
    }
}
