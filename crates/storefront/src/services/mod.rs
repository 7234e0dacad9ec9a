//! Business logic services.
//!
//! - [`auth`] - Session store: signup, login, logout, session tokens
//! - [`cart`] - Cart engine: lines, quantities, totals
//! - [`checkout`] - Simulated payment with a cancellable delay

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AuthError, AuthSettings, PasswordScheme, SessionStore};
pub use cart::{Cart, CartLine, CartTotals};
pub use checkout::{CheckoutError, CheckoutSimulator, CheckoutState, OrderConfirmation, PendingPayment};
