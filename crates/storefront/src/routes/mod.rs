//! View routing and the navigation guard.
//!
//! # View Structure
//!
//! ```text
//! Home                 - Product catalog (initial view)
//! ProductDetail(id)    - Product overlay, drawn over the underlying view
//! Cart                 - Cart lines and totals       (requires auth)
//! Checkout             - Simulated payment           (requires auth, non-empty cart)
//! Auth                 - Login / signup forms
//! ```
//!
//! # Guard Rules
//!
//! 1. `Cart` or `Checkout` while signed out resolves to `Auth`.
//! 2. `Checkout` with an empty cart resolves to `Cart`.
//! 3. Anything else resolves to itself.
//!
//! The requested view is not remembered after a redirect.

use core::fmt;
use std::str::FromStr;

use serde::Serialize;

use eshop_pro_core::ProductId;

use crate::middleware::RequireAuth;
use crate::models::Session;

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(tag = "view", content = "productId", rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    ProductDetail(ProductId),
    Cart,
    Checkout,
    Auth,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::ProductDetail(id) => write!(f, "product {id}"),
            Self::Cart => write!(f, "cart"),
            Self::Checkout => write!(f, "checkout"),
            Self::Auth => write!(f, "auth"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "home" => return Ok(Self::Home),
            "cart" => return Ok(Self::Cart),
            "checkout" => return Ok(Self::Checkout),
            "auth" | "login" | "signup" => return Ok(Self::Auth),
            _ => {}
        }

        lower
            .strip_prefix("product")
            .and_then(|id| id.parse::<ProductId>().ok())
            .map(Self::ProductDetail)
            .ok_or_else(|| format!("unknown view: {}", s.trim()))
    }
}

/// Resolve a requested view against the session and cart.
///
/// Returns the view that should actually be shown.
#[must_use]
pub fn resolve(target: View, session: &Session, cart_is_empty: bool) -> View {
    match target {
        View::Cart | View::Checkout => match RequireAuth::check(session) {
            Err(rejection) => {
                tracing::warn!(%target, "Attempted access while signed out, redirecting");
                rejection.redirect()
            }
            Ok(_) if target == View::Checkout && cart_is_empty => {
                tracing::debug!("Checkout with empty cart, redirecting to cart");
                View::Cart
            }
            Ok(_) => target,
        },
        View::Home | View::ProductDetail(_) | View::Auth => target,
    }
}
