//! Password hashing for Quill.
//!
//! Uses Argon2id. Hashes are stored as PHC strings, so the parameters
//! travel with each hash and can be raised later without a migration.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password consists of digits only.
    #[error("password cannot be entirely numeric")]
    EntirelyNumeric,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash could not be parsed.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Wrong password.
    #[error("password verification failed")]
    VerificationFailed,
}

// m = 19 MiB, t = 2, p = 1 (OWASP minimum for Argon2id).
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params =
        Params::new(19_456, 2, 1, None).map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id.
///
/// # Examples
///
/// ```
/// use quill::auth::hash_password;
///
/// let hash = hash_password("correct horse").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Check the password strength rules that do not depend on the username.
///
/// # Examples
///
/// ```
/// use quill::auth::validate_password;
///
/// assert!(validate_password("short").is_err());
/// assert!(validate_password("12345678").is_err());
/// assert!(validate_password("valid_password_123").is_ok());
/// ```
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(PasswordError::EntirelyNumeric);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_success() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$"));
    }

    #[test]
    fn test_hash_password_salted() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password").unwrap();

        assert!(verify_password("correct_password", &hash).is_ok());
        assert_eq!(
            verify_password("wrong_password", &hash),
            Err(PasswordError::VerificationFailed)
        );
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert_eq!(
            verify_password("any_password", "not_a_valid_hash"),
            Err(PasswordError::InvalidHash)
        );
    }

    #[test]
    fn test_validate_password_length() {
        assert_eq!(validate_password("short1"), Err(PasswordError::TooShort));
        assert!(validate_password("abcd1234").is_ok());
        assert!(validate_password(&"a".repeat(128)).is_ok());
        assert_eq!(
            validate_password(&"a".repeat(129)),
            Err(PasswordError::TooLong)
        );
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 8 characters, 24 bytes
        assert!(validate_password("パスワードです!").is_ok());
    }

    #[test]
    fn test_validate_password_numeric() {
        assert_eq!(
            validate_password("1234567890"),
            Err(PasswordError::EntirelyNumeric)
        );
        assert!(validate_password("1234567890a").is_ok());
    }

    #[test]
    fn test_hash_password_rejects_invalid() {
        assert_eq!(hash_password("short"), Err(PasswordError::TooShort));
    }
}
