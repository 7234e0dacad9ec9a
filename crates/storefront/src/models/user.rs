//! User domain types.

use serde::{Deserialize, Serialize};

use eshop_pro_core::{Email, UserId};

/// A registered mock account as persisted under `mock_users`.
///
/// Records are append-only: created on signup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Opaque account ID.
    pub user_id: UserId,
    /// Unique key across all records (case-sensitive).
    pub email: Email,
    /// Either the raw password or an argon2 PHC string, depending on the
    /// configured password scheme at signup time.
    pub password: String,
    /// Set when `password` is an argon2 PHC string. Omitted for raw passwords.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hashed: bool,
}

impl CredentialRecord {
    /// The identity this record authenticates as.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}

/// The account a session is signed in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: Email,
}
