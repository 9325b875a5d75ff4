//! TOML file configuration structures.
//!
//! These structs directly map to the `paycred-config.toml` file format.

use paycred_core::config::{DEFAULT_CREDENTIALS_FIELDS, DEFAULT_ENCRYPTED_FIELDS};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub encryption: EncryptionConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

/// Admin configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// The admin secret. If this is plaintext (doesn't start with `$argon2`),
    /// it will be hashed and the config file will be rewritten.
    pub secret: String,
}

/// Credential field section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Mandatory credential fields, in write order.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    /// Fields stored encrypted. Must be a subset of `fields`.
    #[serde(default = "default_encrypted_fields")]
    pub encrypted_fields: Vec<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            fields: default_fields(),
            encrypted_fields: default_encrypted_fields(),
        }
    }
}

fn default_fields() -> Vec<String> {
    DEFAULT_CREDENTIALS_FIELDS.map(String::from).to_vec()
}

fn default_encrypted_fields() -> Vec<String> {
    DEFAULT_ENCRYPTED_FIELDS.map(String::from).to_vec()
}

/// Key material section. Keys are base64-encoded 32-byte values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    #[serde(default = "default_key_version")]
    pub key_version: u32,
    /// Data key for encrypting secret credential fields at rest.
    pub key: String,
    /// Master key for unwrapping envelope data keys.
    pub envelope_key: String,
}

fn default_key_version() -> u32 {
    1
}

impl FileConfig {
    /// Check if the admin secret is already hashed (argon2 format).
    pub fn is_admin_secret_hashed(&self) -> bool {
        self.admin.secret.starts_with("$argon2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn test_default_config_parsing() {
        let toml_str = format!(
            r#"
[server]
listen = "127.0.0.1:3000"

[admin]
secret = "test-secret"

[encryption]
key = "{KEY}"
envelope_key = "{KEY}"
"#
        );
        let config: FileConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.credentials, CredentialsConfig::default());
        assert_eq!(config.credentials.fields.len(), 6);
        assert_eq!(config.encryption.key_version, 1);
        assert!(!config.is_admin_secret_hashed());
    }

    #[test]
    fn test_custom_credentials_section() {
        let toml_str = format!(
            r#"
[server]

[admin]
secret = "$argon2id$v=19$m=19456,t=2,p=1$abc123"

[credentials]
fields = ["merchant_id", "api_key"]
encrypted_fields = ["api_key"]

[encryption]
key_version = 3
key = "{KEY}"
envelope_key = "{KEY}"
"#
        );
        let config: FileConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.server.listen, default_listen_addr());
        assert_eq!(config.credentials.fields, vec!["merchant_id", "api_key"]);
        assert_eq!(config.credentials.encrypted_fields, vec!["api_key"]);
        assert_eq!(config.encryption.key_version, 3);
        assert!(config.is_admin_secret_hashed());
    }
}
