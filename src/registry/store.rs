//! In-memory key registry.
//!
//! The record map and the expiry index live behind one `RwLock`, so a
//! record and its expiry are always inserted together. Validation and
//! listing take the read lock; issuance takes the write lock.

use crate::clock::{Clock, SystemClock};
use crate::policy::expiry::{expiry_from, hours_to_seconds, is_expired, TierPolicy};
use crate::registry::record::{
    IssuedKey, KeyGrant, KeyRecord, KeyRejection, KeyView, SeedKey, ValidationOutcome,
};
use crate::registry::token::TokenGenerator;
use crate::GatewayError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// How many fresh tokens to try before giving up on a collision streak.
const MAX_ISSUE_ATTEMPTS: usize = 16;

#[derive(Debug, Default)]
struct RegistryState {
    records: HashMap<String, KeyRecord>,
    /// Present iff the matching record is not lifetime.
    expiry: HashMap<String, DateTime<Utc>>,
}

impl RegistryState {
    fn insert(&mut self, key: String, record: KeyRecord, expires_at: Option<DateTime<Utc>>) {
        if let Some(expires_at) = expires_at {
            self.expiry.insert(key.clone(), expires_at);
        }
        self.records.insert(key, record);
    }
}

/// Registry of access keys with optional expiry.
///
/// Create one per process and share it through `Arc`.
pub struct KeyRegistry {
    state: RwLock<RegistryState>,
    clock: Arc<dyn Clock>,
    policy: TierPolicy,
    generator: TokenGenerator,
}

impl KeyRegistry {
    /// Create a registry seeded with `seeds`, using the system clock.
    ///
    /// # Errors
    /// Returns `Config` if a seed is duplicated or internally inconsistent.
    pub fn new(seeds: Vec<SeedKey>, policy: TierPolicy) -> Result<Self, GatewayError> {
        Self::with_clock(seeds, policy, Arc::new(SystemClock))
    }

    /// Create a registry with a custom clock.
    ///
    /// Expiry for timed seeds is computed from the clock's current time.
    pub fn with_clock(
        seeds: Vec<SeedKey>,
        policy: TierPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        let boot = clock.now_utc();
        let mut state = RegistryState::default();

        for seed in seeds {
            if state.records.contains_key(&seed.key) {
                return Err(GatewayError::Config(format!(
                    "duplicate bootstrap key {}",
                    seed.key
                )));
            }
            let expires_at = seed_expiry(&seed, boot)?;
            state.insert(seed.key, seed.record, expires_at);
        }

        Ok(Self {
            state: RwLock::new(state),
            clock,
            policy,
            generator: TokenGenerator::new(),
        })
    }

    /// Validate a key.
    ///
    /// `None` and the empty string are both treated as a missing key.
    pub fn validate(&self, key: Option<&str>) -> Result<ValidationOutcome, GatewayError> {
        let key = match key {
            Some(k) if !k.is_empty() => k,
            _ => return Ok(ValidationOutcome::Invalid(KeyRejection::Missing)),
        };

        let state = self.read()?;
        let Some(record) = state.records.get(key) else {
            debug!(key, "Unknown key");
            return Ok(ValidationOutcome::Invalid(KeyRejection::NotFound));
        };

        let expires_at = if record.is_lifetime {
            None
        } else {
            let expires_at = state.expiry.get(key).copied().ok_or_else(|| {
                GatewayError::Internal(format!("timed key {} has no expiry", key))
            })?;
            if is_expired(expires_at, self.clock.now_utc()) {
                debug!(key, %expires_at, "Key expired");
                return Ok(ValidationOutcome::Invalid(KeyRejection::Expired));
            }
            Some(expires_at)
        };

        Ok(ValidationOutcome::Valid(KeyGrant {
            tier: record.tier.clone(),
            is_lifetime: record.is_lifetime,
            valid_for_secs: record.valid_for_secs,
            expires_at,
        }))
    }

    /// Issue a new key for `tier`.
    ///
    /// Lifetime tiers ignore `duration_hours`. For every other tier the key
    /// expires `duration_hours` after issuance.
    ///
    /// # Errors
    /// - `InvalidArgument` - empty tier, or a non-positive / unrepresentable
    ///   duration for a timed tier
    /// - `Internal` - lock poisoned or no unique token could be generated
    pub fn issue(&self, tier: &str, duration_hours: f64) -> Result<IssuedKey, GatewayError> {
        if tier.trim().is_empty() {
            return Err(GatewayError::InvalidArgument(
                "tier cannot be empty".to_string(),
            ));
        }

        let record = if self.policy.is_lifetime(tier) {
            KeyRecord::lifetime(tier)
        } else {
            KeyRecord::timed(tier, hours_to_seconds(duration_hours)?)
        };

        let mut state = self.write()?;
        let expires_at = record
            .valid_for_secs
            .map(|secs| expiry_from(self.clock.now_utc(), secs))
            .transpose()?;

        let key = (0..MAX_ISSUE_ATTEMPTS)
            .map(|_| self.generator.generate(tier))
            .find(|candidate| !state.records.contains_key(candidate))
            .ok_or_else(|| {
                GatewayError::Internal(format!("could not generate a unique key for {}", tier))
            })?;

        state.insert(key.clone(), record.clone(), expires_at);
        drop(state);

        info!(key = %key, tier, lifetime = record.is_lifetime, "New key generated");

        Ok(IssuedKey {
            key,
            record,
            expires_at,
        })
    }

    /// Snapshot every entry, sorted by key.
    pub fn list(&self) -> Result<Vec<KeyView>, GatewayError> {
        let now = self.clock.now_utc();
        let state = self.read()?;

        let mut views: Vec<KeyView> = state
            .records
            .iter()
            .map(|(key, record)| {
                let expires_at = state.expiry.get(key).copied();
                KeyView {
                    key: key.clone(),
                    tier: record.tier.clone(),
                    is_lifetime: record.is_lifetime,
                    expires_at,
                    is_expired: expires_at.is_some_and(|at| is_expired(at, now)),
                }
            })
            .collect();

        views.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(views)
    }

    /// Whether `key` is registered (expired or not).
    pub fn contains(&self, key: &str) -> Result<bool, GatewayError> {
        Ok(self.read()?.records.contains_key(key))
    }

    /// Number of registered keys.
    pub fn len(&self) -> Result<usize, GatewayError> {
        Ok(self.read()?.records.len())
    }

    /// Whether the registry holds no keys.
    pub fn is_empty(&self) -> Result<bool, GatewayError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, GatewayError> {
        self.state
            .read()
            .map_err(|_| GatewayError::Internal("key registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, GatewayError> {
        self.state
            .write()
            .map_err(|_| GatewayError::Internal("key registry lock poisoned".to_string()))
    }
}

/// Check a seed's record and compute its expiry from boot time.
fn seed_expiry(seed: &SeedKey, boot: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, GatewayError> {
    match (seed.record.is_lifetime, seed.record.valid_for_secs) {
        (true, None) => Ok(None),
        (false, Some(secs)) if secs > 0 => expiry_from(boot, secs)
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("bootstrap key {}: {}", seed.key, e))),
        (true, Some(_)) => Err(GatewayError::Config(format!(
            "bootstrap key {} is lifetime but declares a validity window",
            seed.key
        ))),
        (false, _) => Err(GatewayError::Config(format!(
            "bootstrap key {} needs a positive validity window",
            seed.key
        ))),
    }
}
