//! Shared types for paycred, the payment-gateway credential importer.
//!
//! This crate holds everything that both the server and its callers need:
//! the admin API objects, the scope descriptor, and the crypto primitives
//! used for at-rest field encryption and credential envelopes.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod crypto;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;

/// Header name for admin API authentication (plaintext secret).
pub const ADMIN_AUTH_HEADER: &str = "Paycred-Admin-Authorization";
