//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `paycred-core::config`.

pub use paycred_core::config::{AdminConfig, CredentialsConfig, EncryptionConfig, ServerConfig};
