//! Expiry arithmetic and lifetime-tier policy.
//!
//! This module decides:
//! - Whether a tier issues lifetime keys
//! - How an issuance duration in hours becomes a validity window
//! - Whether an expiry instant has passed

use crate::GatewayError;
use chrono::{DateTime, Duration, Utc};

/// Tiers that issue lifetime keys unless configured otherwise.
pub const DEFAULT_LIFETIME_TIERS: &[&str] = &["DEVELOPER", "LIFETIME"];

/// Decides which tiers are exempt from expiry.
#[derive(Debug, Clone)]
pub struct TierPolicy {
    lifetime_tiers: Vec<String>,
}

impl TierPolicy {
    /// Build a policy from an explicit list of lifetime tier labels.
    pub fn new<I, S>(lifetime_tiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lifetime_tiers: lifetime_tiers.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether keys issued for `tier` never expire.
    ///
    /// Tier labels are compared exactly; `developer` is not `DEVELOPER`.
    pub fn is_lifetime(&self, tier: &str) -> bool {
        self.lifetime_tiers.iter().any(|t| t == tier)
    }

    /// The configured lifetime tier labels.
    pub fn lifetime_tiers(&self) -> &[String] {
        &self.lifetime_tiers
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME_TIERS.iter().copied())
    }
}

/// Whether `expires_at` has passed at `now`.
///
/// A key is still valid at the exact expiry instant; it expires strictly
/// after it.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

/// Convert an issuance duration in hours into whole seconds.
///
/// # Errors
/// * `InvalidArgument` - duration is not finite, not positive, or rounds
///   to zero seconds
pub fn hours_to_seconds(hours: f64) -> Result<i64, GatewayError> {
    if !hours.is_finite() {
        return Err(GatewayError::InvalidArgument(format!(
            "duration must be a finite number of hours, got {}",
            hours
        )));
    }
    if hours <= 0.0 {
        return Err(GatewayError::InvalidArgument(format!(
            "duration must be positive, got {} hours",
            hours
        )));
    }

    let seconds = (hours * 3600.0).round();
    if seconds < 1.0 {
        return Err(GatewayError::InvalidArgument(format!(
            "duration of {} hours is shorter than one second",
            hours
        )));
    }
    if seconds >= i64::MAX as f64 {
        return Err(GatewayError::InvalidArgument(format!(
            "duration of {} hours is too large",
            hours
        )));
    }

    Ok(seconds as i64)
}

/// Compute the absolute expiry for a window starting at `now`.
///
/// # Errors
/// * `InvalidArgument` - the window does not fit in a calendar date
pub fn expiry_from(now: DateTime<Utc>, valid_for_secs: i64) -> Result<DateTime<Utc>, GatewayError> {
    Duration::try_seconds(valid_for_secs)
        .and_then(|window| now.checked_add_signed(window))
        .ok_or_else(|| {
            GatewayError::InvalidArgument(format!(
                "validity of {} seconds is not representable",
                valid_for_secs
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_policy_lifetime_tiers() {
        let policy = TierPolicy::default();
        assert!(policy.is_lifetime("DEVELOPER"));
        assert!(policy.is_lifetime("LIFETIME"));
        assert!(!policy.is_lifetime("BASIC"));
        assert!(!policy.is_lifetime("developer"));
    }

    #[test]
    fn test_custom_policy() {
        let policy = TierPolicy::new(["UNLIMITED"]);
        assert!(policy.is_lifetime("UNLIMITED"));
        assert!(!policy.is_lifetime("DEVELOPER"));
        assert_eq!(policy.lifetime_tiers(), &["UNLIMITED".to_string()]);
    }

    #[test]
    fn test_not_expired_before_instant() {
        let expiry = t0();
        assert!(!is_expired(expiry, expiry - Duration::seconds(1)));
    }

    #[test]
    fn test_not_expired_at_exact_instant() {
        let expiry = t0();
        assert!(!is_expired(expiry, expiry));
    }

    #[test]
    fn test_expired_after_instant() {
        let expiry = t0();
        assert!(is_expired(expiry, expiry + Duration::milliseconds(1)));
    }

    #[test]
    fn test_hours_to_seconds() {
        assert_eq!(hours_to_seconds(11.0).unwrap(), 39_600);
        assert_eq!(hours_to_seconds(0.5).unwrap(), 1_800);
        assert_eq!(hours_to_seconds(720.0).unwrap(), 2_592_000);
    }

    #[test]
    fn test_hours_to_seconds_rejects_non_positive() {
        assert!(matches!(hours_to_seconds(0.0), Err(GatewayError::InvalidArgument(_))));
        assert!(matches!(hours_to_seconds(-3.0), Err(GatewayError::InvalidArgument(_))));
    }

    #[test]
    fn test_hours_to_seconds_rejects_non_finite() {
        assert!(matches!(hours_to_seconds(f64::NAN), Err(GatewayError::InvalidArgument(_))));
        assert!(matches!(
            hours_to_seconds(f64::INFINITY),
            Err(GatewayError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_hours_to_seconds_rejects_sub_second() {
        assert!(matches!(hours_to_seconds(0.0001), Err(GatewayError::InvalidArgument(_))));
    }

    #[test]
    fn test_expiry_from() {
        let expiry = expiry_from(t0(), 39_600).unwrap();
        assert_eq!(expiry, t0() + Duration::hours(11));
    }

    #[test]
    fn test_expiry_from_unrepresentable() {
        let result = expiry_from(t0(), i64::MAX / 2);
        assert!(matches!(result, Err(GatewayError::InvalidArgument(_))));
    }
}
