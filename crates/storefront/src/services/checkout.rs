//! Checkout simulator.
//!
//! Payment always succeeds after a fixed delay. Each submission gets an
//! [`AttemptId`]; the delay runs outside the simulator and reports back with
//! that id, and a report for anything but the active attempt is ignored. This
//! is how navigating away mid-payment cancels it without aborting the timer.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use eshop_pro_core::{AttemptId, CheckoutStatus, Price};

/// Default simulated payment latency.
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_secs(2);

/// Errors that can occur when submitting a payment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// A payment is already processing.
    #[error("checkout attempt {0} is already processing")]
    InProgress(AttemptId),
}

/// Receipt for a settled payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub attempt: AttemptId,
    pub total: Price,
}

/// Where the checkout currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    Processing { attempt: AttemptId, total: Price },
    Completed { confirmation: OrderConfirmation },
}

impl CheckoutState {
    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        match self {
            Self::Idle => CheckoutStatus::Idle,
            Self::Processing { .. } => CheckoutStatus::Processing,
            Self::Completed { .. } => CheckoutStatus::Completed,
        }
    }
}

/// A submitted payment waiting out its simulated latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending payment does nothing until it is awaited and settled"]
pub struct PendingPayment {
    pub attempt: AttemptId,
    pub total: Price,
    pub delay: Duration,
}

impl PendingPayment {
    /// Sleep for the simulated latency and hand back the attempt id.
    pub async fn wait(self) -> AttemptId {
        tokio::time::sleep(self.delay).await;
        self.attempt
    }
}

/// Tracks the single in-flight checkout attempt.
#[derive(Debug)]
pub struct CheckoutSimulator {
    delay: Duration,
    next_attempt: u32,
    state: CheckoutState,
}

impl CheckoutSimulator {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_attempt: 1,
            state: CheckoutState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Start a payment for `total`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InProgress` while another attempt is processing.
    pub fn begin(&mut self, total: Price) -> Result<PendingPayment, CheckoutError> {
        if let CheckoutState::Processing { attempt, .. } = self.state {
            return Err(CheckoutError::InProgress(attempt));
        }

        let attempt = AttemptId::new(self.next_attempt);
        self.next_attempt = self.next_attempt.wrapping_add(1);
        self.state = CheckoutState::Processing { attempt, total };
        tracing::info!(%attempt, %total, "Payment processing");

        Ok(PendingPayment {
            attempt,
            total,
            delay: self.delay,
        })
    }

    /// Complete `attempt` if it is still the active one.
    ///
    /// Returns `None` for a stale or cancelled attempt.
    pub fn settle(&mut self, attempt: AttemptId) -> Option<OrderConfirmation> {
        match self.state {
            CheckoutState::Processing {
                attempt: active,
                total,
            } if active == attempt => {
                let confirmation = OrderConfirmation { attempt, total };
                self.state = CheckoutState::Completed { confirmation };
                tracing::info!(%attempt, %total, "Payment settled");
                Some(confirmation)
            }
            _ => {
                tracing::debug!(%attempt, "Ignoring settlement for inactive attempt");
                None
            }
        }
    }

    /// Return to `Idle`, abandoning any processing attempt.
    ///
    /// Returns the abandoned attempt, if there was one.
    pub fn reset(&mut self) -> Option<AttemptId> {
        let abandoned = match self.state {
            CheckoutState::Processing { attempt, .. } => {
                tracing::info!(%attempt, "Payment abandoned");
                Some(attempt)
            }
            _ => None,
        };
        self.state = CheckoutState::Idle;
        abandoned
    }
}

impl Default for CheckoutSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_PAYMENT_DELAY)
    }
}
