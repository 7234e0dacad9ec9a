//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] eshop_pro_core::EmailError),

    /// Signup attempted with an empty password.
    #[error("password cannot be empty")]
    EmptyPassword,

    /// No record matches the email and password pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    DuplicateEmail,

    /// The stored session token is unreadable or past its expiry.
    #[error("expired or malformed session token: {0}")]
    ExpiredOrMalformedToken(#[from] TokenError),

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Why a stored session token was rejected.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("payload is not a session claim: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
}
