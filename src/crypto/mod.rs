//! Cryptographic functions for Vestline
//!
//! Provides AES-256-GCM document envelopes with PBKDF2-SHA512 key
//! derivation and SHA-256 content hashes.

pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{
    content_hash, decrypt_from_envelope, encrypt_to_envelope, seal, SealedDocument, HEADER_LEN,
};
pub use key_derivation::{derive_key, DerivedKey};
pub use secure_memory::Passphrase;
