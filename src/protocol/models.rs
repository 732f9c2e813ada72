//! Request and response bodies for the HTTP surface.

use crate::registry::{IssuedKey, KeyRejection, KeyView, ValidationOutcome};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tier used when an issuance request names none.
pub const DEFAULT_ISSUE_TIER: &str = "BASIC";

/// Duration in hours used when an issuance request names none.
pub const DEFAULT_ISSUE_HOURS: f64 = 11.0;

/// Listing placeholder for keys without expiry.
pub const NEVER: &str = "Never";

/// Body of a key verification request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Key to check; absent, `null` and `""` all mean "missing".
    #[serde(default)]
    pub key: Option<String>,

    /// Caller-supplied user id, logged only.
    #[serde(default)]
    pub user_id: Option<Value>,

    /// Caller-supplied hardware id, logged only.
    #[serde(default)]
    pub hwid: Option<Value>,
}

/// Body of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidKeyBody {
    /// Always `true`.
    pub valid: bool,
    /// Tier of the key.
    pub tier: String,
    /// Whether the key never expires.
    pub is_lifetime: bool,
    /// Validity window in seconds, `null` for lifetime keys.
    pub valid_for: Option<i64>,
    /// Expiry as Unix seconds, `null` for lifetime keys.
    pub expires_at: Option<i64>,
}

/// Body of a rejected verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidKeyBody {
    /// Always `false`.
    pub valid: bool,
    /// Machine-readable reason.
    pub reason: KeyRejection,
    /// Human-readable message.
    pub message: String,
}

/// Verification response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VerifyResponse {
    /// The key is usable.
    Valid(ValidKeyBody),
    /// The key is not usable.
    Invalid(InvalidKeyBody),
}

impl From<ValidationOutcome> for VerifyResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Valid(grant) => VerifyResponse::Valid(ValidKeyBody {
                valid: true,
                tier: grant.tier,
                is_lifetime: grant.is_lifetime,
                valid_for: grant.valid_for_secs,
                expires_at: grant.expires_at.map(|at| at.timestamp()),
            }),
            ValidationOutcome::Invalid(reason) => VerifyResponse::Invalid(InvalidKeyBody {
                valid: false,
                reason,
                message: reason.message().to_string(),
            }),
        }
    }
}

/// Body of a key issuance request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRequest {
    /// Tier label for the new key.
    #[serde(default = "default_tier")]
    pub tier: String,

    /// Validity in hours (ignored for lifetime tiers).
    #[serde(default = "default_duration")]
    pub duration: f64,
}

impl Default for IssueRequest {
    fn default() -> Self {
        Self {
            tier: default_tier(),
            duration: default_duration(),
        }
    }
}

fn default_tier() -> String {
    DEFAULT_ISSUE_TIER.to_string()
}

fn default_duration() -> f64 {
    DEFAULT_ISSUE_HOURS
}

/// Issuance response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    /// Always `true`.
    pub success: bool,
    /// The new token.
    pub key: String,
    /// Tier of the key.
    pub tier: String,
    /// Whether the key never expires.
    pub is_lifetime: bool,
    /// Validity window in seconds, `null` for lifetime keys.
    pub valid_for: Option<i64>,
    /// Expiry as Unix seconds, `null` for lifetime keys.
    pub expires_at: Option<i64>,
}

impl From<IssuedKey> for IssueResponse {
    fn from(issued: IssuedKey) -> Self {
        Self {
            success: true,
            key: issued.key,
            tier: issued.record.tier,
            is_lifetime: issued.record.is_lifetime,
            valid_for: issued.record.valid_for_secs,
            expires_at: issued.expires_at.map(|at| at.timestamp()),
        }
    }
}

/// One entry of the key listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyListing {
    /// The token.
    pub key: String,
    /// Tier of the key.
    pub tier: String,
    /// Whether the key never expires.
    pub is_lifetime: bool,
    /// ISO-8601 expiry or `"Never"`.
    pub expires_at: String,
    /// Whether the expiry has passed.
    pub is_expired: bool,
}

impl From<KeyView> for KeyListing {
    fn from(view: KeyView) -> Self {
        Self {
            key: view.key,
            tier: view.tier,
            is_lifetime: view.is_lifetime,
            expires_at: view
                .expires_at
                .map(format_iso)
                .unwrap_or_else(|| NEVER.to_string()),
            is_expired: view.is_expired,
        }
    }
}

/// Key listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResponse {
    /// Every registered key.
    pub keys: Vec<KeyListing>,
}

/// Relay success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayResponse {
    /// Always `true`.
    pub success: bool,
}

/// Paths of every operation, for discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointIndex {
    /// Key verification.
    pub verify: String,
    /// Key-tracking relay.
    pub key_tracking: String,
    /// Developer-activity relay.
    pub developer_activity: String,
    /// All-activity relay.
    pub all_activity: String,
    /// Key issuance.
    pub generate_key: String,
    /// Key listing.
    pub list_keys: String,
}

/// Status/discovery response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    /// Always `"online"`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Crate version.
    pub version: String,
    /// Operation addresses.
    pub endpoints: EndpointIndex,
}

/// Format an instant as ISO-8601 UTC with millisecond precision.
///
/// Example: `2025-01-15T23:00:00.000Z`
pub fn format_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
