//! Runtime configuration types for paycred.
//!
//! These types hold validated values ready for use. Loading and parsing the
//! TOML file is handled by the server crate.

mod admin;
mod credentials;
mod encryption;
mod server;

pub use admin::AdminConfig;
pub use credentials::{CredentialsConfig, DEFAULT_CREDENTIALS_FIELDS, DEFAULT_ENCRYPTED_FIELDS};
pub use encryption::EncryptionConfig;
pub use server::ServerConfig;
