//! Authentication guard.
//!
//! Cart mutations and the cart/checkout views require a signed-in session.
//! Rather than failing, a rejected intent is turned into a redirect to the
//! auth view.

use crate::models::{Identity, Session};
use crate::routes::View;

/// Proof that the session is signed in.
///
/// # Example
///
/// ```rust
/// use eshop_pro_storefront::middleware::{AuthRejection, RequireAuth};
/// use eshop_pro_storefront::models::Session;
/// use eshop_pro_storefront::routes::View;
///
/// let rejection = RequireAuth::check(&Session::anonymous()).unwrap_err();
/// assert_eq!(rejection.redirect(), View::Auth);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireAuth(pub Identity);

/// Returned when a signed-in session is required but absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Send the user to the auth view.
    RedirectToLogin,
}

impl AuthRejection {
    /// The view the rejected intent resolves to.
    #[must_use]
    pub const fn redirect(self) -> View {
        match self {
            Self::RedirectToLogin => View::Auth,
        }
    }
}

impl RequireAuth {
    /// Extract the signed-in identity from `session`.
    ///
    /// # Errors
    ///
    /// Returns `AuthRejection::RedirectToLogin` for a signed-out session.
    pub fn check(session: &Session) -> Result<Self, AuthRejection> {
        session
            .identity()
            .cloned()
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}
