//! Outbound HTTP transport.

pub mod http;
