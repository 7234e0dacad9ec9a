//! Guards applied to intents before they reach the services.
//!
//! - [`auth`] - Require a signed-in session, redirecting to the auth view otherwise

pub mod auth;

pub use auth::{AuthRejection, RequireAuth};
