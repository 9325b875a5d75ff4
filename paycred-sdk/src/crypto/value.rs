//! Sealing of individual configuration values.
//!
//! The nonce is synthetic: the first 12 bytes of
//! `HMAC-SHA256(nonce_key, key_version || plaintext)`, where `nonce_key` is
//! derived from the data key. The same plaintext under the same key always produces the same
//! sealed string, so re-importing identical credentials leaves the stored
//! state unchanged. Distinct plaintexts never share a nonce unless the
//! truncated HMAC collides.

use ring::aead::NONCE_LEN;
use ring::hmac;

use super::{CryptoError, SecretKey, decode, encode, open_with, seal_with, split_nonce};

const NONCE_KEY_LABEL: &[u8] = b"paycred/value-nonce/v1";

/// Encrypt a configuration value.
///
/// Returns `{key_version}:{base64(nonce || ciphertext || tag)}`. The key
/// version is bound into the AEAD associated data.
pub fn seal_value(key: &SecretKey, key_version: u32, plaintext: &str) -> Result<String, CryptoError> {
    let nonce = synthetic_nonce(key, key_version, plaintext.as_bytes());
    let sealed = seal_with(key, nonce, &key_version.to_be_bytes(), plaintext.as_bytes())?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(format!("{key_version}:{}", encode(&blob)))
}

/// Decrypt a value produced by [`seal_value`].
pub fn open_value(key: &SecretKey, key_version: u32, sealed: &str) -> Result<String, CryptoError> {
    let (version, body) = sealed.split_once(':').ok_or(CryptoError::InvalidFormat)?;
    let found: u32 = version.parse().map_err(|_| CryptoError::InvalidFormat)?;
    if found != key_version {
        return Err(CryptoError::KeyVersionMismatch {
            expected: key_version,
            found,
        });
    }

    let blob = decode(body)?;
    let (nonce, ciphertext) = split_nonce(&blob)?;
    let plaintext = open_with(key, nonce, &found.to_be_bytes(), ciphertext)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::NotUtf8)
}

fn synthetic_nonce(key: &SecretKey, key_version: u32, plaintext: &[u8]) -> [u8; NONCE_LEN] {
    let root = hmac::Key::new(hmac::HMAC_SHA256, key.as_bytes());
    let derived = hmac::sign(&root, NONCE_KEY_LABEL);
    let nonce_key = hmac::Key::new(hmac::HMAC_SHA256, derived.as_ref());

    let mut ctx = hmac::Context::with_key(&nonce_key);
    ctx.update(&key_version.to_be_bytes());
    ctx.update(plaintext);
    let tag = ctx.sign();

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&tag.as_ref()[..NONCE_LEN]);
    nonce
}
