//! Password hashing for stored credentials.
//!
//! New hashes are Argon2id PHC strings (`$argon2id$v=19$...`). Credential
//! files written by the earlier tool hold a bare, unsalted SHA-256 hex digest;
//! those still verify so existing accounts keep working.

use anyhow::{anyhow, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::warn;
use sha2::{Digest, Sha256};

/// Single-pass unsalted digest, the legacy on-disk format
pub fn legacy_digest(password: &str) -> String {
    Sha256::digest(password.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn is_legacy_digest(stored_hash: &str) -> bool {
    stored_hash.len() == 64 && stored_hash.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    if is_legacy_digest(stored_hash) {
        return legacy_digest(password) == stored_hash.to_ascii_lowercase();
    }

    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let hash = hash_password("admin123").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let parsed = PasswordHash::new(&hash).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(parsed.salt.is_some());

        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn test_legacy_digest_still_verifies() {
        // sha256("admin123")
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert_eq!(legacy_digest("admin123"), legacy);
        assert!(verify_password("admin123", legacy));
        assert!(verify_password("admin123", &legacy.to_ascii_uppercase()));
        assert!(!verify_password("user123", legacy));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("x", "md5$salt$digest"));
        assert!(!verify_password("x", "$argon2id$garbage"));
        assert!(!verify_password("x", "a$b"));
        assert!(!verify_password("", ""));
    }
}
