//! Signup confirmation-code helpers.
//!
//! Codes are short-lived shared secrets delivered out of band; only their
//! SHA-256 hash is stored server-side so a database leak does not let an
//! attacker complete someone else's signup.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a 6-digit confirmation code.
///
/// Returns a tuple of `(plaintext_code, sha256_hex_hash)`. The plaintext
/// is handed to the delivery mechanism; only the hash should be persisted.
pub fn generate_confirmation_code() -> (String, String) {
    let code: u32 = rand::rng().random_range(100_000..=999_999);
    let plaintext = code.to_string();
    let hash = hash_confirmation_code(&plaintext);
    (plaintext, hash)
}

/// Compute the SHA-256 hex digest of a confirmation code.
///
/// Use this to compare an incoming code against the stored hash.
pub fn hash_confirmation_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..32 {
            let (code, _) = generate_confirmation_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hash_is_stable() {
        let (code, hash) = generate_confirmation_code();
        assert_eq!(hash, hash_confirmation_code(&code));
        // Sanity: the hash should be a 64-char hex string (SHA-256).
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_different_codes_hash_differently() {
        assert_ne!(
            hash_confirmation_code("100000"),
            hash_confirmation_code("100001")
        );
    }
}
