//! Cloudflare zone status lookups
//!
//! Provides the HTTP client for `GET /zones/{id}` and the typed view of its
//! response envelope.

mod client;
mod types;

pub use client::{ZoneClient, ZoneStatusSource};
pub use types::{ZoneQueryResult, ZoneStatus};
