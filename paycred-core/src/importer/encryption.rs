//! Field encryption and envelope decryption seams.

use paycred_sdk::crypto::{CryptoError, Envelope, SecretKey, open_value, seal_value};
use thiserror::Error;

use crate::config::EncryptionConfig;

#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("field encryption failed: {0}")]
    Crypto(#[from] CryptoError),
}

/// Encrypts configuration values for at-rest storage.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError>;
}

/// AES-256-GCM encryptor keyed by the platform data key.
#[derive(Debug, Clone)]
pub struct AeadEncryptor {
    key: SecretKey,
    key_version: u32,
}

impl AeadEncryptor {
    pub fn new(key: SecretKey, key_version: u32) -> Self {
        Self { key, key_version }
    }

    pub fn from_config(config: &EncryptionConfig) -> Self {
        Self::new(config.key.clone(), config.key_version)
    }

    /// Reverse [`encrypt`](Encryptor::encrypt).
    pub fn decrypt(&self, sealed: &str) -> Result<String, EncryptionError> {
        Ok(open_value(&self.key, self.key_version, sealed)?)
    }
}

impl Encryptor for AeadEncryptor {
    fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        Ok(seal_value(&self.key, self.key_version, plaintext)?)
    }
}

/// Two switches passed through to the envelope decryptor.
///
/// The importer always passes [`EnvelopeFlags::OFF`]. Their meaning belongs
/// to the decryptor implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvelopeFlags {
    pub first: bool,
    pub second: bool,
}

impl EnvelopeFlags {
    pub const OFF: Self = Self {
        first: false,
        second: false,
    };
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("envelope decryption failed: {0}")]
    Crypto(#[from] CryptoError),
}

impl EnvelopeError {
    /// Whether the envelope itself is unreadable: bad JSON shape, bad
    /// encoding, or contents that do not open under the master key.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            EnvelopeError::Crypto(
                CryptoError::InvalidEnvelope(_)
                    | CryptoError::InvalidBase64
                    | CryptoError::InvalidFormat
                    | CryptoError::InvalidKeyLength(_)
                    | CryptoError::OpenFailed
                    | CryptoError::NotUtf8
            )
        )
    }
}

/// Turns a serialized envelope into the plaintext credentials JSON.
pub trait EnvelopeDecryptor: Send + Sync {
    fn decrypt_payload(
        &self,
        serialized_payload: &str,
        flags: EnvelopeFlags,
    ) -> Result<String, EnvelopeError>;
}

/// Opens [`Envelope`]s whose data key is wrapped with the configured master
/// key.
#[derive(Debug, Clone)]
pub struct KeyWrapEnvelopeDecryptor {
    master_key: SecretKey,
}

impl KeyWrapEnvelopeDecryptor {
    pub fn new(master_key: SecretKey) -> Self {
        Self { master_key }
    }

    pub fn from_config(config: &EncryptionConfig) -> Self {
        Self::new(config.envelope_key.clone())
    }
}

impl EnvelopeDecryptor for KeyWrapEnvelopeDecryptor {
    fn decrypt_payload(
        &self,
        serialized_payload: &str,
        _flags: EnvelopeFlags,
    ) -> Result<String, EnvelopeError> {
        let envelope = Envelope::from_json(serialized_payload)?;
        Ok(envelope.open(&self.master_key)?)
    }
}
