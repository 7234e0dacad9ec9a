//! Async runtime around [`AppState`].
//!
//! One tokio task owns the state. Intents arrive over an mpsc channel and are
//! applied strictly in order; every change is published as a fresh
//! [`Snapshot`] on a watch channel. A started payment is waited out on its own
//! task, which posts the attempt id back into the same channel so settlement
//! is serialized with everything else.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use eshop_pro_core::AttemptId;

use crate::error::{AppError, Result};
use crate::services::checkout::PendingPayment;
use crate::state::{AppState, Intent, Snapshot};

const COMMAND_BUFFER: usize = 64;

enum Command {
    Dispatch {
        intent: Intent,
        reply: oneshot::Sender<Result<Snapshot>>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
    PaymentSettled {
        attempt: AttemptId,
    },
}

/// Cloneable handle to a running storefront.
///
/// The owning task stops once every handle has been dropped and no payment
/// is still pending.
#[derive(Clone)]
pub struct StorefrontHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl StorefrontHandle {
    /// Apply `intent` and return the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns whatever [`AppState::dispatch`] rejects the intent with, or
    /// `AppError::Shutdown` if the owning task is gone.
    pub async fn dispatch(&self, intent: Intent) -> Result<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { intent, reply })
            .await
            .map_err(|_| AppError::Shutdown)?;
        response.await.map_err(|_| AppError::Shutdown)?
    }

    /// The current snapshot, after every intent sent before this call.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Shutdown` if the owning task is gone.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| AppError::Shutdown)?;
        response.await.map_err(|_| AppError::Shutdown)
    }

    /// Watch for state changes, including ones no intent caused (a payment
    /// settling).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }
}

/// Start the owning task for `state`.
///
/// Must be called from within a tokio runtime.
pub fn spawn(state: AppState) -> (StorefrontHandle, JoinHandle<()>) {
    let (commands, inbox) = mpsc::channel(COMMAND_BUFFER);
    let (publisher, snapshots) = watch::channel(state.snapshot());
    let loopback = commands.downgrade();

    let task = tokio::spawn(run(state, inbox, loopback, publisher));

    (
        StorefrontHandle {
            commands,
            snapshots,
        },
        task,
    )
}

async fn run(
    mut state: AppState,
    mut inbox: mpsc::Receiver<Command>,
    loopback: mpsc::WeakSender<Command>,
    publisher: watch::Sender<Snapshot>,
) {
    tracing::debug!("Storefront runtime started");

    while let Some(command) = inbox.recv().await {
        match command {
            Command::Dispatch { intent, reply } => {
                let result = match state.dispatch(intent) {
                    Ok(pending) => {
                        if let Some(pending) = pending {
                            schedule_settlement(pending, &loopback);
                        }
                        Ok(())
                    }
                    Err(e) => {
                        e.report();
                        Err(e)
                    }
                };

                let snapshot = state.snapshot();
                publisher.send_replace(snapshot.clone());
                let _ = reply.send(result.map(|()| snapshot));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }
            Command::PaymentSettled { attempt } => {
                if let Some(confirmation) = state.settle_payment(attempt) {
                    tracing::info!(%attempt, total = %confirmation.total, "Order confirmed");
                    publisher.send_replace(state.snapshot());
                }
            }
        }
    }

    tracing::debug!("Storefront runtime stopped");
}

fn schedule_settlement(pending: PendingPayment, loopback: &mpsc::WeakSender<Command>) {
    let Some(commands) = loopback.upgrade() else {
        return;
    };

    tokio::spawn(async move {
        let attempt = pending.wait().await;
        if commands
            .send(Command::PaymentSettled { attempt })
            .await
            .is_err()
        {
            tracing::debug!(%attempt, "Runtime gone before payment settled");
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use eshop_pro_core::{CheckoutStatus, ProductId};

    use super::*;
    use crate::catalog::Catalog;
    use crate::clock::ManualClock;
    use crate::db::MemoryStore;
    use crate::routes::View;
    use crate::services::auth::{AuthSettings, PasswordScheme, SessionStore};
    use crate::services::checkout::CheckoutSimulator;

    fn start() -> (StorefrontHandle, JoinHandle<()>) {
        let sessions = SessionStore::new(
            Box::new(MemoryStore::new()),
            Arc::new(ManualClock::starting_at(0)),
            AuthSettings {
                password_scheme: PasswordScheme::Plain,
                ..AuthSettings::default()
            },
        );
        let state = AppState::new(
            sessions,
            Catalog::new(),
            CheckoutSimulator::new(Duration::from_secs(2)),
        )
        .unwrap();
        spawn(state)
    }

    async fn ready_to_pay(handle: &StorefrontHandle) {
        handle
            .dispatch(Intent::Signup {
                email: "a@x.com".to_owned(),
                password: "pw".to_owned(),
            })
            .await
            .unwrap();
        handle.dispatch(Intent::AddItem(ProductId::new(3))).await.unwrap();
        handle.dispatch(Intent::Navigate(View::Checkout)).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_settles_after_delay() {
        let (handle, _task) = start();
        ready_to_pay(&handle).await;

        let mut updates = handle.subscribe();
        let snapshot = handle.dispatch(Intent::Pay).await.unwrap();
        assert_eq!(snapshot.checkout.status(), CheckoutStatus::Processing);
        assert_eq!(snapshot.cart_lines.len(), 1);

        let started = tokio::time::Instant::now();
        let settled = updates
            .wait_for(|s| s.checkout.status() == CheckoutStatus::Completed)
            .await
            .unwrap()
            .clone();

        assert!(started.elapsed() >= Duration::from_secs(2));
        assert!(settled.cart_lines.is_empty());
        assert_eq!(settled.current_view, View::Checkout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigating_away_cancels_payment() {
        let (handle, _task) = start();
        ready_to_pay(&handle).await;

        handle.dispatch(Intent::Pay).await.unwrap();
        let snapshot = handle.dispatch(Intent::Navigate(View::Cart)).await.unwrap();
        assert_eq!(snapshot.checkout.status(), CheckoutStatus::Idle);

        tokio::time::sleep(Duration::from_secs(3)).await;

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.checkout.status(), CheckoutStatus::Idle);
        assert_eq!(snapshot.cart_lines.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_is_rejected() {
        let (handle, _task) = start();
        ready_to_pay(&handle).await;

        handle.dispatch(Intent::Pay).await.unwrap();
        let err = handle.dispatch(Intent::Pay).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(_)));
    }

    #[tokio::test]
    async fn test_task_stops_when_handles_drop() {
        let (handle, task) = start();
        handle.dispatch(Intent::SetSearch("watch".to_owned())).await.unwrap();
        drop(handle);
        task.await.unwrap();
    }
}
