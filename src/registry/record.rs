//! Key records, bootstrap seeds and validation outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata stored for every access key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Entitlement label (e.g. "BASIC", "PREMIUM", "DEVELOPER").
    pub tier: String,

    /// Whether the key never expires.
    pub is_lifetime: bool,

    /// Validity window in seconds; `None` for lifetime keys.
    pub valid_for_secs: Option<i64>,
}

impl KeyRecord {
    /// A record for a key that never expires.
    pub fn lifetime(tier: impl Into<String>) -> Self {
        Self {
            tier: tier.into(),
            is_lifetime: true,
            valid_for_secs: None,
        }
    }

    /// A record for a key valid for `valid_for_secs` after issuance.
    pub fn timed(tier: impl Into<String>, valid_for_secs: i64) -> Self {
        Self {
            tier: tier.into(),
            is_lifetime: false,
            valid_for_secs: Some(valid_for_secs),
        }
    }
}

/// A key to install when the registry is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedKey {
    /// The literal token.
    pub key: String,

    /// Record to install for it.
    pub record: KeyRecord,
}

impl SeedKey {
    /// Pair a token with its record.
    pub fn new(key: impl Into<String>, record: KeyRecord) -> Self {
        Self {
            key: key.into(),
            record,
        }
    }
}

/// The bootstrap key set installed at process start.
pub fn default_seed_keys() -> Vec<SeedKey> {
    vec![
        SeedKey::new("DEVELOPER-LIFETIME-2025", KeyRecord::lifetime("DEVELOPER")),
        SeedKey::new("PREMIUM-30DAYS", KeyRecord::timed("PREMIUM", 30 * 24 * 60 * 60)),
        SeedKey::new("BASIC-11H", KeyRecord::timed("BASIC", 11 * 60 * 60)),
    ]
}

/// Why a key failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRejection {
    /// No key was supplied.
    Missing,
    /// The key is not in the registry.
    NotFound,
    /// The key exists but its expiry has passed.
    Expired,
}

impl KeyRejection {
    /// Stable reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyRejection::Missing => "missing",
            KeyRejection::NotFound => "not_found",
            KeyRejection::Expired => "expired",
        }
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            KeyRejection::Missing => "Key not provided",
            KeyRejection::NotFound => "Key is invalid or not found",
            KeyRejection::Expired => "Key has expired",
        }
    }
}

impl std::fmt::Display for KeyRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of a key that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGrant {
    /// Tier of the key.
    pub tier: String,

    /// Whether the key never expires.
    pub is_lifetime: bool,

    /// Validity window in seconds (`None` for lifetime keys).
    pub valid_for_secs: Option<i64>,

    /// Expiry instant (`None` for lifetime keys).
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of validating a key. Rejections are normal outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The key is usable.
    Valid(KeyGrant),
    /// The key is not usable.
    Invalid(KeyRejection),
}

impl ValidationOutcome {
    /// Whether the key is usable.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    /// The rejection reason, if any.
    pub fn rejection(&self) -> Option<KeyRejection> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Invalid(reason) => Some(*reason),
        }
    }
}

/// A freshly issued key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedKey {
    /// The generated token.
    pub key: String,

    /// The record stored for it.
    pub record: KeyRecord,

    /// Expiry instant (`None` for lifetime keys).
    pub expires_at: Option<DateTime<Utc>>,
}

/// A registry entry as reported by listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyView {
    /// The token.
    pub key: String,

    /// Tier of the key.
    pub tier: String,

    /// Whether the key never expires.
    pub is_lifetime: bool,

    /// Expiry instant (`None` means never).
    pub expires_at: Option<DateTime<Utc>>,

    /// Whether the expiry has passed at listing time.
    pub is_expired: bool,
}
