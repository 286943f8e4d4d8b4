//! Password storage
//!
//! Passwords are stored exactly as typed unless hashing is enabled, in which
//! case new passwords become Argon2id PHC strings. Verification handles both
//! forms so switching hashing on never locks out existing users.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::result::{Error, Result};

/// Turn a password into the value persisted in the account store
pub fn store_password(password: &str, hash: bool) -> Result<String> {
    if hash {
        hash_password(password)
    } else {
        Ok(password.to_string())
    }
}

/// Argon2id hash in PHC string format
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Credential(format!("Failed to hash password: {}", e)))
}

const ARGON2_IDENTS: [&str; 3] = ["argon2i", "argon2d", "argon2id"];

/// A stored value counts as a hash only if it is a complete Argon2 PHC string.
/// Plaintext passwords may legitimately look like other PHC strings.
fn parse_argon2(stored: &str) -> Option<PasswordHash<'_>> {
    let parsed = PasswordHash::new(stored).ok()?;
    (ARGON2_IDENTS.contains(&parsed.algorithm.as_str()) && parsed.hash.is_some()).then_some(parsed)
}

/// Whether a stored value is an Argon2 hash rather than plaintext
pub fn is_hashed(stored: &str) -> bool {
    parse_argon2(stored).is_some()
}

/// Check a supplied password against the stored value
pub fn verify_password(stored: &str, supplied: &str) -> bool {
    match parse_argon2(stored) {
        Some(parsed) => Argon2::default()
            .verify_password(supplied.as_bytes(), &parsed)
            .is_ok(),
        None => stored == supplied,
    }
}
