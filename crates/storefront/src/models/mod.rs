//! Domain models for the storefront.
//!
//! - [`user`] - Credential records and the signed-in identity
//! - [`session`] - Session state, token claims and storage keys

pub mod session;
pub mod user;

pub use session::{Session, SessionClaims, keys as storage_keys};
pub use user::{CredentialRecord, Identity};
