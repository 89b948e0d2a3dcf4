//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce.  The
//! nonce, ciphertext and 16-byte tag are returned separately so the
//! vault file can lay them out as distinct fields.  Callers pass the
//! vault header as associated data, which binds it to the ciphertext.

use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce, Tag};
use zeroize::{Zeroize, Zeroizing};

use super::keys::DerivedKey;
use crate::errors::{CredVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Output of one `encrypt` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` under `key`, authenticating `aad` alongside it.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8], aad: &[u8]) -> Result<SealedPayload> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Encrypt in place on a copy so the tag comes back detached.
    let mut buffer = plaintext.to_vec();
    let tag = match cipher.encrypt_in_place_detached(&nonce, aad, &mut buffer) {
        Ok(tag) => tag,
        Err(e) => {
            buffer.zeroize();
            return Err(CredVaultError::EncryptionFailed(format!(
                "encryption error: {e}"
            )));
        }
    };

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&nonce);
    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(SealedPayload {
        nonce: nonce_bytes,
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Decrypt and verify a payload produced by `encrypt`.
///
/// Any mismatch in key, nonce, ciphertext, tag or `aad` returns
/// `AuthenticationFailed`.  No plaintext is ever returned on failure.
pub fn decrypt(key: &DerivedKey, sealed: &SealedPayload, aad: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CredVaultError::AuthenticationFailed)?;

    let nonce = Nonce::from_slice(&sealed.nonce);
    let tag = Tag::from_slice(&sealed.tag);

    let mut buffer = Zeroizing::new(sealed.ciphertext.clone());
    cipher
        .decrypt_in_place_detached(nonce, aad, buffer.as_mut_slice(), tag)
        .map_err(|_| CredVaultError::AuthenticationFailed)?;

    Ok(buffer)
}
