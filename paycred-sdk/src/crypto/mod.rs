//! AES-256-GCM primitives shared by the field encryptor and the envelope
//! format.
//!
//! Two schemes live here:
//!
//! * **Sealed values** ([`seal_value`] / [`open_value`]): a single
//!   configuration value encrypted under the platform data key. The wire
//!   format is
//!
//!   ```text
//!   {key_version}:{base64(nonce || ciphertext || tag)}
//!   ```
//!
//! * **Envelopes** ([`Envelope`]): a whole credentials JSON document
//!   encrypted under a fresh data key, which is itself wrapped with a
//!   master key.
//!
//! Base64 is RFC 4648 without padding throughout.

mod envelope;
mod keys;
mod value;

pub use envelope::{ENVELOPE_MARKER, Envelope, seal_envelope};
pub use keys::{KEY_LEN, SecretKey};
pub use value::{open_value, seal_value};

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};

/// Errors produced by crypto operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid sealed data format")]
    InvalidFormat,
    #[error("unsupported key version {found}, expected {expected}")]
    KeyVersionMismatch { expected: u32, found: u32 },
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),
    #[error("random number generation failed")]
    Rng,
    #[error("encryption failed")]
    SealFailed,
    #[error("decryption failed: wrong key or corrupted data")]
    OpenFailed,
    #[error("decrypted data is not valid UTF-8")]
    NotUtf8,
}

fn encode(bytes: &[u8]) -> String {
    fast32::base64::RFC4648_NOPAD.encode(bytes)
}

fn decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    // Producers on other platforms often pad; the decoder does not accept it.
    fast32::base64::RFC4648_NOPAD
        .decode_str(encoded.trim().trim_end_matches('='))
        .map_err(|_| CryptoError::InvalidBase64)
}

fn aead_key(key: &SecretKey) -> Result<LessSafeKey, CryptoError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes()).map_err(|_| CryptoError::SealFailed)?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` and return `ciphertext || tag`.
fn seal_with(
    key: &SecretKey,
    nonce: [u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = aead_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce),
        Aad::from(aad),
        &mut in_out,
    )
    .map_err(|_| CryptoError::SealFailed)?;
    Ok(in_out)
}

/// Decrypt `ciphertext || tag` and return the plaintext bytes.
fn open_with(
    key: &SecretKey,
    nonce: [u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = aead_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(
            Nonce::assume_unique_for_key(nonce),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| CryptoError::OpenFailed)?;
    Ok(plaintext.to_vec())
}

/// Split a `nonce || rest` blob.
fn split_nonce(blob: &[u8]) -> Result<([u8; NONCE_LEN], &[u8]), CryptoError> {
    if blob.len() < NONCE_LEN {
        return Err(CryptoError::InvalidFormat);
    }
    let (nonce, rest) = blob.split_at(NONCE_LEN);
    let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| CryptoError::InvalidFormat)?;
    Ok((nonce, rest))
}
