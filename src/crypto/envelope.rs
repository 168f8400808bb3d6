//! Document envelope encryption
//!
//! Envelope layout, fixed and stable across versions:
//!
//! ```text
//! salt (64) || iv (16) || GCM tag (16) || ciphertext (plaintext length)
//! ```
//!
//! The key is PBKDF2-HMAC-SHA512 over the passphrase and the envelope's
//! salt. The cipher is AES-256-GCM with a 16-byte IV.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{rand_core::RngCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::key_derivation::{derive_key, generate_salt, SALT_LEN};
use crate::error::{PortalError, PortalResult};

/// IV length in bytes
pub const IV_LEN: usize = 16;

/// GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Bytes before the ciphertext
pub const HEADER_LEN: usize = SALT_LEN + IV_LEN + TAG_LEN;

/// AES-256-GCM with a 128-bit nonce
type DocumentCipher = AesGcm<Aes256, U16>;

/// An encrypted document plus the plaintext digest stored next to it
#[derive(Debug, Clone)]
pub struct SealedDocument {
    pub envelope: Vec<u8>,
    /// Hex SHA-256 of the plaintext
    pub content_hash: String,
    pub plaintext_len: u64,
}

/// Hex SHA-256 of a buffer
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Encrypt and hash a document in one step
pub fn seal(plaintext: &[u8], passphrase: &str) -> PortalResult<SealedDocument> {
    Ok(SealedDocument {
        envelope: encrypt_to_envelope(plaintext, passphrase)?,
        content_hash: content_hash(plaintext),
        plaintext_len: plaintext.len() as u64,
    })
}

/// Encrypt `plaintext` into a self-describing envelope
pub fn encrypt_to_envelope(plaintext: &[u8], passphrase: &str) -> PortalResult<Vec<u8>> {
    let salt = generate_salt();
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let key = derive_key(passphrase, &salt)?;
    let cipher = DocumentCipher::new_from_slice(key.as_bytes())
        .map_err(|e| PortalError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
        .map_err(|e| PortalError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut envelope = Vec::with_capacity(HEADER_LEN + buffer.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(tag.as_slice());
    envelope.extend_from_slice(&buffer);

    Ok(envelope)
}

/// Decrypt an envelope produced by [`encrypt_to_envelope`]
///
/// The tag is checked before anything is returned. Any mismatch (wrong
/// passphrase, flipped bit, truncation) is an `Integrity` error and no
/// plaintext escapes.
pub fn decrypt_from_envelope(envelope: &[u8], passphrase: &str) -> PortalResult<Vec<u8>> {
    if envelope.len() < HEADER_LEN {
        return Err(PortalError::Integrity(format!(
            "Envelope is {} bytes, shorter than the {} byte header",
            envelope.len(),
            HEADER_LEN
        )));
    }

    let (salt, rest) = envelope.split_at(SALT_LEN);
    let (iv, rest) = rest.split_at(IV_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let key = derive_key(passphrase, salt)?;
    let cipher = DocumentCipher::new_from_slice(key.as_bytes())
        .map_err(|e| PortalError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut buffer = ciphertext.to_vec();
    if cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .is_err()
    {
        buffer.zeroize();
        return Err(PortalError::Integrity(
            "Authentication tag mismatch: wrong passphrase or corrupted envelope".to_string(),
        ));
    }

    Ok(buffer)
}
