//! Integration tests for the CredVault crypto module.

use credvault::crypto::kdf::Argon2Params;
use credvault::crypto::{decrypt, derive_key, encrypt, generate_password, generate_salt};
use credvault::errors::CredVaultError;

/// Minimum-cost params so tests stay fast.
fn fast_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn derive_key_is_deterministic() {
    let salt = generate_salt();
    let a = derive_key(b"correct-horse", &salt, &fast_params()).unwrap();
    let b = derive_key(b"correct-horse", &salt, &fast_params()).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn different_salts_give_different_keys() {
    let a = derive_key(b"correct-horse", &generate_salt(), &fast_params()).unwrap();
    let b = derive_key(b"correct-horse", &generate_salt(), &fast_params()).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn different_passwords_give_different_keys() {
    let salt = generate_salt();
    let a = derive_key(b"correct-horse", &salt, &fast_params()).unwrap();
    let b = derive_key(b"correct-horsf", &salt, &fast_params()).unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn different_params_give_different_keys() {
    let salt = generate_salt();
    let a = derive_key(b"correct-horse", &salt, &fast_params()).unwrap();
    let b = derive_key(
        b"correct-horse",
        &salt,
        &Argon2Params {
            iterations: 2,
            ..fast_params()
        },
    )
    .unwrap();
    assert_ne!(a.as_bytes(), b.as_bytes());
}

#[test]
fn empty_password_is_rejected() {
    let result = derive_key(b"", &generate_salt(), &fast_params());
    assert!(matches!(result, Err(CredVaultError::EmptyMasterPassword)));
}

#[test]
fn out_of_range_params_are_rejected() {
    let params = Argon2Params {
        memory_kib: 1,
        ..fast_params()
    };
    assert!(derive_key(b"pw", &generate_salt(), &params).is_err());
}

// ---------------------------------------------------------------------------
// Authenticated encryption
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let plaintext = br#"{"version":1,"credentials":[]}"#;

    let sealed = encrypt(&key, plaintext, b"header").unwrap();
    assert_eq!(sealed.ciphertext.len(), plaintext.len());

    let recovered = decrypt(&key, &sealed, b"header").unwrap();
    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn encrypting_twice_uses_fresh_nonces() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let a = encrypt(&key, b"same", b"").unwrap();
    let b = encrypt(&key, b"same", b"").unwrap();
    assert_ne!(a.nonce, b.nonce);
    assert_ne!(a.ciphertext, b.ciphertext);
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let sealed = encrypt(&key, b"", b"aad").unwrap();
    assert!(sealed.ciphertext.is_empty());
    assert!(decrypt(&key, &sealed, b"aad").unwrap().is_empty());
}

#[test]
fn wrong_key_fails_authentication() {
    let salt = generate_salt();
    let right = derive_key(b"right", &salt, &fast_params()).unwrap();
    let wrong = derive_key(b"wrong", &salt, &fast_params()).unwrap();

    let sealed = encrypt(&right, b"secret", b"").unwrap();
    let result = decrypt(&wrong, &sealed, b"");
    assert!(matches!(result, Err(CredVaultError::AuthenticationFailed)));
}

#[test]
fn wrong_aad_fails_authentication() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let sealed = encrypt(&key, b"secret", b"header-a").unwrap();
    let result = decrypt(&key, &sealed, b"header-b");
    assert!(matches!(result, Err(CredVaultError::AuthenticationFailed)));
}

#[test]
fn every_single_bit_flip_is_detected() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let sealed = encrypt(&key, b"github.com alice p@ss1", b"hdr").unwrap();

    for byte in 0..sealed.ciphertext.len() {
        for bit in 0..8 {
            let mut t = sealed.clone();
            t.ciphertext[byte] ^= 1 << bit;
            assert!(
                matches!(decrypt(&key, &t, b"hdr"), Err(CredVaultError::AuthenticationFailed)),
                "ciphertext byte {byte} bit {bit}"
            );
        }
    }
    for byte in 0..sealed.tag.len() {
        for bit in 0..8 {
            let mut t = sealed.clone();
            t.tag[byte] ^= 1 << bit;
            assert!(
                matches!(decrypt(&key, &t, b"hdr"), Err(CredVaultError::AuthenticationFailed)),
                "tag byte {byte} bit {bit}"
            );
        }
    }
    for byte in 0..sealed.nonce.len() {
        for bit in 0..8 {
            let mut t = sealed.clone();
            t.nonce[byte] ^= 1 << bit;
            assert!(
                matches!(decrypt(&key, &t, b"hdr"), Err(CredVaultError::AuthenticationFailed)),
                "nonce byte {byte} bit {bit}"
            );
        }
    }
}

#[test]
fn truncated_ciphertext_fails_authentication() {
    let key = derive_key(b"pw", &generate_salt(), &fast_params()).unwrap();
    let mut sealed = encrypt(&key, b"secret", b"").unwrap();
    sealed.ciphertext.pop();
    assert!(matches!(
        decrypt(&key, &sealed, b""),
        Err(CredVaultError::AuthenticationFailed)
    ));
}

// ---------------------------------------------------------------------------
// Password generation
// ---------------------------------------------------------------------------

#[test]
fn generated_password_has_requested_length_and_alphabet() {
    let pw = generate_password(16).unwrap();
    assert_eq!(pw.chars().count(), 16);
    assert!(pw.chars().all(|c| c.is_ascii_graphic()));
}

#[test]
fn successive_generated_passwords_differ() {
    let a = generate_password(32).unwrap();
    let b = generate_password(32).unwrap();
    assert_ne!(a, b);
}

#[test]
fn zero_length_generation_is_rejected() {
    assert!(matches!(
        generate_password(0),
        Err(CredVaultError::InvalidLength(_))
    ));
}
