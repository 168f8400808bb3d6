//! Key derivation using PBKDF2-HMAC-SHA512
//!
//! Each document envelope carries its own random salt; the key is derived
//! from the vault passphrase and that salt.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{PortalError, PortalResult};

/// Salt length stored at the front of every envelope
pub const SALT_LEN: usize = 64;

/// AES-256 key length
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds. Part of the envelope format: changing it breaks old files.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A derived encryption key, wiped on drop
pub struct DerivedKey {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Fresh random salt from the OS generator
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 32-byte key from a passphrase and salt
pub fn derive_key(passphrase: &str, salt: &[u8]) -> PortalResult<DerivedKey> {
    if passphrase.is_empty() {
        return Err(PortalError::Encryption(
            "Document passphrase must not be empty".to_string(),
        ));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, key.as_mut_slice());

    Ok(DerivedKey { key })
}
