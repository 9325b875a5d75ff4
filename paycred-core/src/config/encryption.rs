//! Key material configuration.

use paycred_sdk::crypto::SecretKey;

/// Keys used by the importer.
#[derive(Debug, Clone)]
pub struct EncryptionConfig {
    /// Version tag written in front of every encrypted value.
    pub key_version: u32,
    /// Data key for at-rest encryption of secret fields.
    pub key: SecretKey,
    /// Master key that unwraps the data key of incoming envelopes.
    pub envelope_key: SecretKey,
}
