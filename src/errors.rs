//! Keyrelay error types.

use crate::relay::Channel;
use thiserror::Error;

/// Errors that can occur while serving key and relay requests.
///
/// Key-domain outcomes (unknown, expired or missing keys) are not errors;
/// they are reported through [`crate::registry::ValidationOutcome`].
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request shape is malformed (wrong type, bad JSON, bad duration).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No destination URL is configured for the relay channel.
    #[error("Webhook URL not configured for {channel}")]
    Configuration {
        /// The channel that has no destination.
        channel: Channel,
    },

    /// Outbound delivery failed (connection, timeout or non-2xx status).
    #[error("Webhook transport error: {0}")]
    Transport(String),

    /// Process configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Machine-readable code for relay failures.
    ///
    /// Unconfigured channels get their own code so callers can alert an
    /// operator instead of treating the failure as transient.
    pub fn relay_code(&self) -> &'static str {
        match self {
            GatewayError::Configuration { .. } => "WEBHOOK_NOT_CONFIGURED",
            GatewayError::InvalidArgument(_) => "INVALID_ARGUMENT",
            _ => "DISCORD_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_channel() {
        let err = GatewayError::Configuration {
            channel: Channel::KeyTracking,
        };
        assert_eq!(err.to_string(), "Webhook URL not configured for key-tracking");
        assert_eq!(err.relay_code(), "WEBHOOK_NOT_CONFIGURED");
    }

    #[test]
    fn transport_error_uses_generic_code() {
        let err = GatewayError::Transport("HTTP 502".to_string());
        assert_eq!(err.relay_code(), "DISCORD_ERROR");
        assert!(err.to_string().contains("HTTP 502"));
    }
}
