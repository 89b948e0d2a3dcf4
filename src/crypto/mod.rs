//! Cryptographic primitives for CredVault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroizing `DerivedKey` wrapper (`keys`)
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - CSPRNG-backed password generation (`generator`)

pub mod encryption;
pub mod generator;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use encryption::{decrypt, encrypt, SealedPayload};
pub use generator::generate_password;
pub use kdf::{derive_key, generate_salt, Argon2Params, Salt};
pub use keys::DerivedKey;
