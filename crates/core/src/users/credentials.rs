//! Password hashing.
//!
//! New passwords are stored as Argon2 PHC strings. Files written before
//! hashing was introduced hold plaintext passwords; those still verify, and
//! the caller is told to upgrade the stored value.

use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::{Error, Result};

const PHC_PREFIX: &str = "$argon2";

/// Outcome of checking a candidate password against a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Valid,
    /// Matched a plaintext credential; it should be replaced by a hash.
    ValidLegacy,
    Invalid,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(format!("Failed to hash password: {e}")))
}

pub fn verify_password(candidate: &str, stored: &str) -> Result<PasswordCheck> {
    if !is_hashed(stored) {
        let check = if !stored.is_empty() && candidate == stored {
            PasswordCheck::ValidLegacy
        } else {
            PasswordCheck::Invalid
        };
        return Ok(check);
    }

    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::Unexpected(format!("Stored password hash is invalid: {e}")))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(PasswordCheck::Valid),
        Err(PasswordHashError::Password) => Ok(PasswordCheck::Invalid),
        Err(other) => Err(Error::Unexpected(format!(
            "Password verification failed: {other}"
        ))),
    }
}

pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with(PHC_PREFIX)
}
