//! Password hashing and opaque identifier generation.

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

use crate::types::BearerToken;

/// Bytes of entropy behind every opaque id and bearer token.
const OPAQUE_BYTES: usize = 32;

/// Hash a password for storage (don't store raw passwords).
///
/// Produces a PHC-format argon2id string with a fresh random salt, so two
/// hashes of the same password differ while both verify.
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Verify a submitted password against a stored PHC string.
///
/// A malformed stored hash verifies as false rather than erroring.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

/// Generate a random opaque identifier: 32 bytes of OS entropy, hex-encoded.
///
/// Used for user ids, bookmark ids and bearer tokens alike. Collision
/// probability is negligible at this size.
pub fn new_opaque_id() -> Result<String> {
    let mut bytes = [0u8; OPAQUE_BYTES];
    getrandom::getrandom(&mut bytes).map_err(|e| anyhow!(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Generate a fresh bearer token.
pub fn new_token() -> Result<BearerToken> {
    Ok(BearerToken::new(new_opaque_id()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let h1 = hash_password("hunter2").unwrap();
        let h2 = hash_password("hunter2").unwrap();

        // Fresh salt every time, yet both verify.
        assert_ne!(h1, h2);
        assert!(verify_password(&h1, "hunter2"));
        assert!(verify_password(&h2, "hunter2"));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("not-a-phc-string", "hunter2"));
        assert!(!verify_password("", "hunter2"));
    }

    #[test]
    fn test_opaque_id_shape() {
        let id = new_opaque_id().unwrap();
        assert_eq!(id.len(), OPAQUE_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_opaque_ids_are_unique() {
        let a = new_opaque_id().unwrap();
        let b = new_opaque_id().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_shape() {
        let token = new_token().unwrap();
        assert_eq!(token.as_str().len(), 64);
    }
}
