//! Status enums shared between the state machine and its renderers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Progress of a simulated checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// No payment has been submitted.
    #[default]
    Idle,
    /// A payment is in flight; further submissions are rejected.
    Processing,
    /// The payment settled and the cart was cleared.
    Completed,
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}
