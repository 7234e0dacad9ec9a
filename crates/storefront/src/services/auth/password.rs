//! Password storage schemes.

use std::str::FromStr;

use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};

use super::AuthError;

/// How new passwords are written into credential records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Argon2id PHC strings.
    #[default]
    Argon2,
    /// The raw password, byte for byte.
    Plain,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" => Ok(Self::Argon2),
            "plain" | "plaintext" => Ok(Self::Plain),
            other => Err(format!("unknown password scheme: {other}")),
        }
    }
}

impl PasswordScheme {
    /// Whether stored passwords are hashes rather than raw text.
    #[must_use]
    pub const fn is_hashed(self) -> bool {
        matches!(self, Self::Argon2)
    }

    /// Produce the stored form of `password`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn store(self, password: &str) -> Result<String, AuthError> {
        match self {
            Self::Argon2 => hash_password(password),
            Self::Plain => Ok(password.to_owned()),
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Check `candidate` against a stored password.
///
/// `hashed` comes from the record, not the configured scheme, so records
/// written under either scheme keep verifying.
#[must_use]
pub fn verify(stored: &str, hashed: bool, candidate: &str) -> bool {
    if !hashed {
        return stored == candidate;
    }
    PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(candidate.as_bytes(), &hash)
            .is_ok()
    })
}
