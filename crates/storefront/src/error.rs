//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything the controller can fail
//! with. Storage failures are captured to Sentry when reported; everything
//! else is an expected user-facing outcome.

use thiserror::Error;

use eshop_pro_core::ProductId;

use crate::config::ConfigError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local store operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Product id not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The controller task is gone.
    #[error("Storefront runtime has shut down")]
    Shutdown,
}

impl AppError {
    /// Whether this error signals a broken environment rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Config(_)
                | Self::Shutdown
                | Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash)
        )
    }

    /// Message suitable for showing to the shopper.
    ///
    /// Internal details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password.".to_string(),
                AuthError::DuplicateEmail => "User already exists".to_string(),
                AuthError::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
                AuthError::EmptyPassword => "Please enter a password.".to_string(),
                AuthError::ExpiredOrMalformedToken(_) => {
                    "Your session has expired, please log in again.".to_string()
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Something went wrong, please try again.".to_string()
                }
            },
            Self::Checkout(CheckoutError::InProgress(_)) => {
                "Payment is already processing.".to_string()
            }
            Self::UnknownProduct(id) => format!("Product {id} does not exist."),
            Self::Storage(_) | Self::Config(_) | Self::Shutdown => {
                "Something went wrong, please try again.".to_string()
            }
        }
    }

    /// Log this error, capturing internal ones to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::debug!(error = %self, "Rejected intent");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
