//! Password hashing and policy checks.
//!
//! Hashes use Argon2id with a random salt, stored as PHC strings.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hash error: {0}")]
    Hash(String),

    #[error("Password verify error: {0}")]
    Verify(String),

    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    TooShort,

    #[error("Password must contain at least one lowercase letter, one uppercase letter and one digit")]
    TooWeak,
}

/// Hashes a password with Argon2id.
///
/// CPU-bound; call from `spawn_blocking` inside async code.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Returns whether `password` matches the stored `hash`.
///
/// # Errors
///
/// Returns [`PasswordError::Verify`] only if `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| PasswordError::Verify(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash of a throwaway password with the same parameters as real hashes.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-never-issued").ok());

/// Runs a full Argon2 verification against a throwaway hash and returns false.
///
/// Used when no account matches, so that path costs the same as a wrong password.
pub fn verify_against_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}

/// Checks the password policy: 8+ characters with a lowercase letter,
/// an uppercase letter and a digit.
pub fn check_password_policy(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }

    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_lower && has_upper && has_digit) {
        return Err(PasswordError::TooWeak);
    }

    Ok(())
}

pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}
