//! Credential envelopes.
//!
//! An envelope carries a complete credentials JSON document encrypted
//! under a one-off data key. The data key travels alongside it, wrapped
//! with the master key the receiving platform holds:
//!
//! ```json
//! {
//!   "encryptedKey": "<base64(nonce || AES-GCM(master_key, data_key))>",
//!   "encryptedPayload": "<base64(AES-GCM(data_key, credentials_json))>",
//!   "iv": "<base64(payload nonce)>"
//! }
//! ```
//!
//! Unknown keys in the envelope object are ignored.

use ring::aead::NONCE_LEN;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

use super::{CryptoError, SecretKey, decode, encode, open_with, seal_with, split_nonce};

/// Key whose presence marks a credentials payload as an envelope.
pub const ENVELOPE_MARKER: &str = "encryptedKey";

/// Wire form of an encrypted credentials payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub encrypted_key: String,
    pub encrypted_payload: String,
    pub iv: String,
}

impl Envelope {
    /// Parse an envelope from its JSON serialization.
    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the envelope to JSON.
    pub fn to_json(&self) -> Result<String, CryptoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Unwrap the data key with `master_key` and decrypt the payload.
    pub fn open(&self, master_key: &SecretKey) -> Result<String, CryptoError> {
        let key_blob = decode(&self.encrypted_key)?;
        let (key_nonce, wrapped_key) = split_nonce(&key_blob)?;
        let data_key = open_with(master_key, key_nonce, &[], wrapped_key)?;
        let data_key = SecretKey::from_bytes(&data_key)?;

        let iv: [u8; NONCE_LEN] = decode(&self.iv)?
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidFormat)?;
        let payload = decode(&self.encrypted_payload)?;
        let plaintext = open_with(&data_key, iv, &[], &payload)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::NotUtf8)
    }
}

/// Encrypt `plaintext` into a new envelope addressed to `master_key`.
pub fn seal_envelope(master_key: &SecretKey, plaintext: &str) -> Result<Envelope, CryptoError> {
    let rng = SystemRandom::new();
    let data_key = SecretKey::generate()?;

    let mut key_nonce = [0u8; NONCE_LEN];
    rng.fill(&mut key_nonce).map_err(|_| CryptoError::Rng)?;
    let wrapped_key = seal_with(master_key, key_nonce, &[], data_key.as_bytes())?;
    let mut key_blob = Vec::with_capacity(NONCE_LEN + wrapped_key.len());
    key_blob.extend_from_slice(&key_nonce);
    key_blob.extend_from_slice(&wrapped_key);

    let mut iv = [0u8; NONCE_LEN];
    rng.fill(&mut iv).map_err(|_| CryptoError::Rng)?;
    let payload = seal_with(&data_key, iv, &[], plaintext.as_bytes())?;

    Ok(Envelope {
        encrypted_key: encode(&key_blob),
        encrypted_payload: encode(&payload),
        iv: encode(&iv),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_opens_with_master_key() {
        let master = SecretKey::generate().unwrap();
        let envelope = seal_envelope(&master, r#"{"merchant_id":"M1"}"#).unwrap();
        assert_eq!(envelope.open(&master).unwrap(), r#"{"merchant_id":"M1"}"#);
    }

    #[test]
    fn test_envelope_json_uses_marker_key() {
        let master = SecretKey::generate().unwrap();
        let json = seal_envelope(&master, "{}").unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get(ENVELOPE_MARKER).is_some());
        assert!(value.get("encryptedPayload").is_some());
        assert!(value.get("iv").is_some());
    }

    #[test]
    fn test_envelope_ignores_unknown_keys() {
        let master = SecretKey::generate().unwrap();
        let envelope = seal_envelope(&master, "{}").unwrap();
        let mut value = serde_json::to_value(&envelope).unwrap();
        value["sigKeyID"] = serde_json::Value::from("key-1");
        let parsed = Envelope::from_json(&value.to_string()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn test_wrong_master_key_fails() {
        let master = SecretKey::generate().unwrap();
        let other = SecretKey::generate().unwrap();
        let envelope = seal_envelope(&master, "{}").unwrap();
        assert!(matches!(envelope.open(&other), Err(CryptoError::OpenFailed)));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(matches!(
            Envelope::from_json(r#"{"encryptedKey":"abc"}"#),
            Err(CryptoError::InvalidEnvelope(_))
        ));
    }
}
