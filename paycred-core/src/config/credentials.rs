//! Credential field configuration.

/// Mandatory credential fields when none are configured, in write order.
pub const DEFAULT_CREDENTIALS_FIELDS: [&str; 6] = [
    "merchant_id",
    "access_key",
    "secret_key",
    "client_id",
    "client_secret",
    "credentials_region",
];

/// Fields stored encrypted when none are configured.
pub const DEFAULT_ENCRYPTED_FIELDS: [&str; 2] = ["secret_key", "client_secret"];

/// Which credential fields are imported and which are stored encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsConfig {
    pub fields: Vec<String>,
    pub encrypted_fields: Vec<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_CREDENTIALS_FIELDS.map(String::from).to_vec(),
            encrypted_fields: DEFAULT_ENCRYPTED_FIELDS.map(String::from).to_vec(),
        }
    }
}
