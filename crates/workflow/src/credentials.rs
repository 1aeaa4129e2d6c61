//! Argon2id password hashing and one-time password generation.
//!
//! Hashes use the PHC string format so the algorithm parameters and salt
//! travel with the hash. Plaintext passwords are only ever returned to the
//! caller that generated them and are never stored.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use ivv_core::error::CoreError;
use rand::Rng;

/// Accepted length range for user-chosen passwords.
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 40;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A hash that does not parse (such as the sentinel user's `!`) never
/// verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Generate a random alphanumeric password of `length` characters.
pub fn generate_password(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length.max(MIN_PASSWORD_LENGTH))
        .map(char::from)
        .collect()
}

/// Check a user-chosen password against the length bounds.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(CoreError::invalid_field(
            "new_password",
            format!(
                "must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"), "expected argon2id PHC prefix");
        assert!(verify_password("correct-horse", &hash));
        assert!(!verify_password("wrong-horse", &hash));
    }

    #[test]
    fn unparseable_hash_never_verifies() {
        assert!(!verify_password("anything", "!"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn generated_passwords_are_alphanumeric_and_distinct() {
        let a = generate_password(16);
        let b = generate_password(16);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn generated_length_has_a_floor() {
        assert_eq!(generate_password(2).len(), MIN_PASSWORD_LENGTH);
    }

    #[test]
    fn strength_bounds() {
        assert!(validate_password_strength("abcdef").is_ok());
        assert!(validate_password_strength(&"x".repeat(40)).is_ok());
        assert_matches!(
            validate_password_strength("abc"),
            Err(CoreError::Validation(fields)) if fields[0].field == "new_password"
        );
        assert!(validate_password_strength(&"x".repeat(41)).is_err());
    }
}
