//! Wire formats for the gateway's HTTP surface.

pub mod models;
