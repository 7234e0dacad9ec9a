//! Session-related types.

use serde::{Deserialize, Serialize};

use eshop_pro_core::{Email, UserId};

use super::Identity;

/// Authentication status of the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// A signed-out session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A session signed in as `identity`.
    #[must_use]
    pub const fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Email of the signed-in account, if any.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        self.identity.as_ref().map(|identity| &identity.email)
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Payload of the session token stored under `jwtToken`.
///
/// `exp` is an absolute expiry in milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: UserId,
    pub email: Email,
    pub exp: i64,
}

impl SessionClaims {
    /// Whether the token is still valid at `now_ms`.
    #[must_use]
    pub const fn is_live_at(&self, now_ms: i64) -> bool {
        self.exp > now_ms
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Storage keys for authentication data.
pub mod keys {
    /// Key for the JSON array of credential records.
    pub const MOCK_USERS: &str = "mock_users";

    /// Key for the encoded session token.
    pub const JWT_TOKEN: &str = "jwtToken";
}
