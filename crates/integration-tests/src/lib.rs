//! Integration tests for E-Shop Pro.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eshop-pro-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_flows` - Signup, login, logout and session restore
//! - `cart_flows` - Cart mutations through the controller and the auth guard
//! - `checkout_flows` - Navigation guard and the simulated payment
//!
//! Every scenario runs against a fresh store and a manual clock; nothing
//! touches the network or the real time of day.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use eshop_pro_storefront::catalog::Catalog;
use eshop_pro_storefront::clock::ManualClock;
use eshop_pro_storefront::db::{FileStore, KeyValueStore, MemoryStore};
use eshop_pro_storefront::services::auth::{AuthSettings, PasswordScheme, SessionStore};
use eshop_pro_storefront::services::checkout::CheckoutSimulator;
use eshop_pro_storefront::state::{AppState, Intent};

/// Fixed starting instant for the manual clock (2023-11-14T22:13:20Z).
pub const START_MS: i64 = 1_700_000_000_000;

/// Payment latency used by every scenario.
pub const PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// Session store settings with plain passwords, so tests skip hashing cost.
#[must_use]
pub fn plain_settings() -> AuthSettings {
    AuthSettings {
        password_scheme: PasswordScheme::Plain,
        ..AuthSettings::default()
    }
}

/// Build an application state over `store`.
///
/// # Panics
///
/// Panics if the store cannot be read.
#[must_use]
#[allow(clippy::expect_used)]
pub fn storefront(store: Box<dyn KeyValueStore>, clock: &ManualClock, settings: AuthSettings) -> AppState {
    let sessions = SessionStore::new(store, Arc::new(clock.clone()), settings);
    AppState::new(sessions, Catalog::new(), CheckoutSimulator::new(PAYMENT_DELAY))
        .expect("Failed to build storefront")
}

/// A fresh in-memory storefront.
#[must_use]
pub fn memory_storefront(clock: &ManualClock) -> AppState {
    storefront(Box::new(MemoryStore::new()), clock, plain_settings())
}

/// A storefront over the JSON file at `path`.
///
/// # Panics
///
/// Panics if the file cannot be opened.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_storefront(path: &Path, clock: &ManualClock, settings: AuthSettings) -> AppState {
    let store = FileStore::open(path).expect("Failed to open file store");
    storefront(Box::new(store), clock, settings)
}

/// Sign up `email` with password `pw`.
///
/// # Panics
///
/// Panics if the signup is rejected.
#[allow(clippy::expect_used)]
pub fn sign_up(app: &mut AppState, email: &str) {
    app.dispatch(Intent::Signup {
        email: email.to_owned(),
        password: "pw".to_owned(),
    })
    .expect("Signup failed");
}
