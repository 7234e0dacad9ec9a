//! Mock session tokens.
//!
//! A token is the standard base64 encoding of the JSON claims
//! `{"userId":..,"email":..,"exp":..}`. It is not signed: anyone holding the
//! store can mint one. The format is kept so existing stored sessions keep
//! working.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::TokenError;
use crate::models::{Identity, SessionClaims};

/// Build claims for `identity` expiring `ttl_ms` after `now_ms`.
#[must_use]
pub fn issue(identity: &Identity, now_ms: i64, ttl_ms: i64) -> SessionClaims {
    SessionClaims {
        user_id: identity.user_id.clone(),
        email: identity.email.clone(),
        exp: now_ms.saturating_add(ttl_ms),
    }
}

/// Encode claims into the stored token form.
///
/// # Errors
///
/// Returns `TokenError::Payload` if the claims cannot be serialized.
pub fn encode(claims: &SessionClaims) -> Result<String, TokenError> {
    let json = serde_json::to_vec(claims)?;
    Ok(STANDARD.encode(json))
}

/// Decode a stored token without checking expiry.
///
/// # Errors
///
/// Returns `TokenError::Encoding` or `TokenError::Payload` if the token is
/// not base64 JSON with `userId`, `email` and `exp` fields.
pub fn decode(token: &str) -> Result<SessionClaims, TokenError> {
    let bytes = STANDARD.decode(token.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decode a stored token and require `exp > now_ms`.
///
/// # Errors
///
/// Returns `TokenError::Expired` for a well-formed but stale token, or the
/// errors of [`decode`].
pub fn validate(token: &str, now_ms: i64) -> Result<SessionClaims, TokenError> {
    let claims = decode(token)?;
    if !claims.is_live_at(now_ms) {
        return Err(TokenError::Expired {
            exp: claims.exp,
            now: now_ms,
        });
    }
    Ok(claims)
}
