//! HTTP error responses.
//!
//! Each route family answers failures in its own envelope:
//! - verify: `{"valid": false, "message": ...}`
//! - generate-key: `{"success": false, "error": ...}`
//! - keys: `{"keys": [], "error": ...}`
//! - relay: `{"success": false, "error": ..., "code": ...}`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::GatewayError;

/// Response shape for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Key verification.
    Verify,
    /// Key issuance.
    Issue,
    /// Key listing.
    List,
    /// Notification relay.
    Relay,
}

/// A `GatewayError` bound to the envelope of the route that produced it.
#[derive(Debug)]
pub struct ApiError {
    /// Response shape.
    pub envelope: Envelope,
    /// Underlying failure.
    pub error: GatewayError,
}

impl ApiError {
    /// Failure of the verify route.
    pub fn verify(error: GatewayError) -> Self {
        Self {
            envelope: Envelope::Verify,
            error,
        }
    }

    /// Failure of the generate-key route.
    pub fn issue(error: GatewayError) -> Self {
        Self {
            envelope: Envelope::Issue,
            error,
        }
    }

    /// Failure of the listing route.
    pub fn list(error: GatewayError) -> Self {
        Self {
            envelope: Envelope::List,
            error,
        }
    }

    /// Failure of a relay route.
    pub fn relay(error: GatewayError) -> Self {
        Self {
            envelope: Envelope::Relay,
            error,
        }
    }

    /// HTTP status for the underlying error.
    pub fn status(&self) -> StatusCode {
        match self.error {
            GatewayError::InvalidArgument(_) | GatewayError::Configuration { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Transport(_) | GatewayError::Config(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match (&self.error, self.envelope) {
            (GatewayError::InvalidArgument(_), _) | (GatewayError::Configuration { .. }, _) => {
                self.error.to_string()
            }
            (GatewayError::Transport(cause), Envelope::Relay) => {
                format!("Failed to send Discord webhook: {}", cause)
            }
            (_, Envelope::Verify) => format!("Server error: {}", self.error),
            _ => self.error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.error, "Request failed");
        }

        let message = self.message();
        let body = match self.envelope {
            Envelope::Verify => json!({ "valid": false, "message": message }),
            Envelope::Issue => json!({ "success": false, "error": message }),
            Envelope::List => json!({ "keys": [], "error": message }),
            Envelope::Relay => json!({
                "success": false,
                "error": message,
                "code": self.error.relay_code(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for ApiError {}
