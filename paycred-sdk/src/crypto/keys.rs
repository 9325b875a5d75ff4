//! 256-bit key material.

use std::fmt;

use ring::rand::{SecureRandom, SystemRandom};

use super::{CryptoError, decode, encode};

/// Length in bytes of every key used by paycred.
pub const KEY_LEN: usize = 32;

/// A 256-bit AES key.
///
/// `Debug` never prints the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Build a key from raw bytes. The slice must be exactly [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(key))
    }

    /// Decode a base64 key as written in the configuration file.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&decode(encoded)?)
    }

    /// Generate a fresh key from the system CSPRNG.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut key = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut key)
            .map_err(|_| CryptoError::Rng)?;
        Ok(Self(key))
    }

    /// Base64 form suitable for the configuration file.
    pub fn to_base64(&self) -> String {
        encode(&self.0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_key_roundtrip() {
        let key = SecretKey::generate().unwrap();
        let parsed = SecretKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn test_padded_base64_is_accepted() {
        let key = SecretKey::from_bytes(&[7u8; KEY_LEN]).unwrap();
        let padded = format!("{}=", key.to_base64());
        assert_eq!(SecretKey::from_base64(&padded).unwrap(), key);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let err = SecretKey::from_bytes(&[0u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength(16)));
    }

    #[test]
    fn test_debug_hides_key() {
        let key = SecretKey::from_bytes(&[1u8; KEY_LEN]).unwrap();
        assert_eq!(format!("{key:?}"), "SecretKey(..)");
    }
}
