//! PIN hashing
//!
//! PINs are never stored in plain text. They are hashed with Argon2id and
//! a random salt, and kept as PHC strings in the secure store.

use crate::error::{AppError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a PIN into a PHC string (`$argon2id$v=19$...`)
pub fn hash_pin(pin: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| AppError::Generic(format!("PIN hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a PIN against a stored PHC string
pub fn verify_pin(pin: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::SecureStore(format!("Stored PIN hash is corrupt: {}", e)))?;

    match Argon2::default().verify_password(pin.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Generic(format!("PIN verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_pin("4821").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_pin("4821", &hash).unwrap());
    }

    #[test]
    fn test_wrong_pin() {
        let hash = hash_pin("4821").unwrap();

        assert!(!verify_pin("4822", &hash).unwrap());
        assert!(!verify_pin("", &hash).unwrap());
    }

    #[test]
    fn test_different_salts() {
        let first = hash_pin("123456").unwrap();
        let second = hash_pin("123456").unwrap();

        assert_ne!(first, second);
        assert!(verify_pin("123456", &first).unwrap());
        assert!(verify_pin("123456", &second).unwrap());
    }

    #[test]
    fn test_plain_value_is_not_a_hash() {
        assert!(verify_pin("1234", "1234").is_err());
    }
}
