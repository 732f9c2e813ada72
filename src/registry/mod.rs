//! Access key registry: records, token generation and the shared store.

pub mod record;
pub mod store;
pub mod token;

pub use record::{
    default_seed_keys, IssuedKey, KeyGrant, KeyRecord, KeyRejection, KeyView, SeedKey,
    ValidationOutcome,
};
pub use store::KeyRegistry;
