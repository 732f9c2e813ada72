//! Key expiry and tier rules.

pub mod expiry;
