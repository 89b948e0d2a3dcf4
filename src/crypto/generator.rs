//! Random password generation.

use rand::Rng;

use crate::errors::{CredVaultError, Result};

/// ASCII letters, digits and punctuation (94 printable characters).
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz\
0123456789\
!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 16;

/// Longest password we are willing to generate.
pub const MAX_LENGTH: usize = 4096;

/// Generate a password of exactly `length` characters from [`ALPHABET`].
///
/// Characters are drawn uniformly from `rand`'s thread-local CSPRNG.
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 {
        return Err(CredVaultError::InvalidLength(
            "password length must be at least 1".into(),
        ));
    }
    if length > MAX_LENGTH {
        return Err(CredVaultError::InvalidLength(format!(
            "password length cannot exceed {MAX_LENGTH} (got {length})"
        )));
    }

    let mut rng = rand::rng();
    let password = (0..length)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_94_unique_printable_chars() {
        assert_eq!(ALPHABET.len(), 94);
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 94);
        assert!(ALPHABET.iter().all(|b| b.is_ascii_graphic()));
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            generate_password(0),
            Err(CredVaultError::InvalidLength(_))
        ));
    }

    #[test]
    fn oversized_length_is_rejected() {
        assert!(generate_password(MAX_LENGTH + 1).is_err());
        assert_eq!(generate_password(MAX_LENGTH).unwrap().len(), MAX_LENGTH);
    }
}
