//! # Keyrelay
//!
//! **License-key registry and chat-webhook relay behind a small HTTP API.**
//!
//! Keyrelay keeps an in-memory table of license keys, answers verification
//! requests against it, issues new keys on demand, and forwards JSON
//! notifications to one of three chat webhooks.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `POST` | `/webhook/verify` | Check a key |
//! | `POST` | `/webhook/generate-key` | Issue a key |
//! | `GET` | `/webhook/keys` | List every key |
//! | `POST` | `/webhook/discord/{channel}` | Relay a notification |
//! | `GET` | `/` | Status and route discovery |
//! | `GET` | `/health` | Liveness |
//!
//! ## Quickstart
//!
//! ```no_run
//! use keyrelay::{KeyRegistry, registry::default_seed_keys};
//! use keyrelay::policy::expiry::TierPolicy;
//!
//! fn main() -> Result<(), keyrelay::GatewayError> {
//!     let registry = KeyRegistry::new(default_seed_keys(), TierPolicy::default())?;
//!     let issued = registry.issue("PREMIUM", 24.0)?;
//!     let outcome = registry.validate(Some(&issued.key))?;
//!     assert!(outcome.is_valid());
//!     Ok(())
//! }
//! ```
//!
//! ## Expiry
//!
//! A timed key expires once the clock is strictly past `expires_at`. Keys
//! of a lifetime tier (`DEVELOPER` and `LIFETIME` by default) never expire.
//! Expired keys are rejected but never removed.
//!
//! ## Configuration
//!
//! See [`GatewayConfig`] for sources and fields.

#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Domain
pub mod policy;
pub mod registry;
pub mod relay;

// Outbound client
pub mod client;

// Wire types
pub mod protocol;

// HTTP surface
pub mod api;
pub mod logging;
pub mod server;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use registry::KeyRegistry;
pub use relay::{Channel, NotificationRelay};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
