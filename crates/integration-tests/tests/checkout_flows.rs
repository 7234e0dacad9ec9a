//! Integration tests for the navigation guard and the simulated payment.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use eshop_pro_core::{CheckoutStatus, Price, ProductId};
use eshop_pro_integration_tests::{PAYMENT_DELAY, START_MS, memory_storefront, sign_up};
use eshop_pro_storefront::clock::ManualClock;
use eshop_pro_storefront::routes::View;
use eshop_pro_storefront::runtime::{self, StorefrontHandle};
use eshop_pro_storefront::services::checkout::CheckoutState;
use eshop_pro_storefront::state::{AppState, Intent};

fn signed_in() -> AppState {
    let clock = ManualClock::starting_at(START_MS);
    let mut app = memory_storefront(&clock);
    sign_up(&mut app, "a@x.com");
    app
}

async fn at_checkout_with(handle: &StorefrontHandle, ids: &[u32]) {
    for id in ids {
        handle
            .dispatch(Intent::AddItem(ProductId::new(*id)))
            .await
            .unwrap();
    }
    let snapshot = handle.dispatch(Intent::Navigate(View::Checkout)).await.unwrap();
    assert_eq!(snapshot.current_view, View::Checkout);
}

// ============================================================================
// Navigation Guard
// ============================================================================

#[test]
fn test_checkout_with_empty_cart_resolves_to_cart() {
    let mut app = signed_in();
    app.dispatch(Intent::Navigate(View::Checkout)).unwrap();
    assert_eq!(app.view(), View::Cart);
}

#[test]
fn test_protected_views_need_a_session() {
    let clock = ManualClock::starting_at(START_MS);
    let mut app = memory_storefront(&clock);

    for target in [View::Cart, View::Checkout] {
        app.dispatch(Intent::Navigate(View::Home)).unwrap();
        app.dispatch(Intent::Navigate(target)).unwrap();
        assert_eq!(app.view(), View::Auth);
    }

    app.dispatch(Intent::Navigate(View::Home)).unwrap();
    assert_eq!(app.view(), View::Home);
}

// ============================================================================
// Payment
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pay_confirms_after_delay_and_empties_cart() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[1, 1, 6]).await;

    let mut updates = handle.subscribe();
    let started = tokio::time::Instant::now();
    let snapshot = handle.dispatch(Intent::Pay).await.unwrap();
    assert_eq!(snapshot.checkout.status(), CheckoutStatus::Processing);

    let settled = updates
        .wait_for(|s| s.checkout.status() == CheckoutStatus::Completed)
        .await
        .unwrap()
        .clone();

    assert!(started.elapsed() >= PAYMENT_DELAY);
    assert!(settled.cart_lines.is_empty());
    let CheckoutState::Completed { confirmation } = settled.checkout else {
        panic!("expected completed checkout");
    };
    assert_eq!(confirmation.total, Price::from_cents(2 * 9999 + 4500));

    // Leaving the success screen starts the next checkout from scratch.
    let snapshot = handle.dispatch(Intent::Navigate(View::Home)).await.unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_payment_cancelled_by_navigating_away() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[3]).await;

    handle.dispatch(Intent::Pay).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.dispatch(Intent::Navigate(View::Home)).await.unwrap();

    tokio::time::sleep(PAYMENT_DELAY * 2).await;

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);
    assert_eq!(snapshot.cart_lines.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_payment_cancelled_by_logout() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[3]).await;

    handle.dispatch(Intent::Pay).await.unwrap();
    let snapshot = handle.dispatch(Intent::Logout).await.unwrap();
    assert!(!snapshot.session.is_authenticated);

    tokio::time::sleep(PAYMENT_DELAY * 2).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);
    assert_eq!(snapshot.current_view, View::Home);
}

#[tokio::test(start_paused = true)]
async fn test_payment_cancelled_by_signing_in_again() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[1]).await;

    handle.dispatch(Intent::Pay).await.unwrap();
    let snapshot = handle
        .dispatch(Intent::Login {
            email: "a@x.com".to_owned(),
            password: "pw".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(snapshot.current_view, View::Home);
    assert_eq!(snapshot.checkout, CheckoutState::Idle);

    tokio::time::sleep(PAYMENT_DELAY * 2).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);
    assert_eq!(snapshot.cart_lines.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_payment_cancelled_by_opening_a_product() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[1]).await;

    handle.dispatch(Intent::Pay).await.unwrap();
    let snapshot = handle
        .dispatch(Intent::SelectProduct(ProductId::new(5)))
        .await
        .unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);

    let snapshot = handle.dispatch(Intent::DismissProduct).await.unwrap();
    assert_eq!(snapshot.current_view, View::Checkout);

    tokio::time::sleep(PAYMENT_DELAY * 2).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.checkout, CheckoutState::Idle);
    assert_eq!(snapshot.cart_lines.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_after_cancel_settles_only_the_new_attempt() {
    let (handle, _task) = runtime::spawn(signed_in());
    at_checkout_with(&handle, &[8]).await;

    handle.dispatch(Intent::Pay).await.unwrap();
    handle.dispatch(Intent::Navigate(View::Cart)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    handle.dispatch(Intent::Navigate(View::Checkout)).await.unwrap();
    let snapshot = handle.dispatch(Intent::Pay).await.unwrap();
    let CheckoutState::Processing { attempt, .. } = snapshot.checkout else {
        panic!("expected processing checkout");
    };

    // The first attempt's timer fires here and must be ignored.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.checkout.status(), CheckoutStatus::Processing);
    assert_eq!(snapshot.cart_lines.len(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let snapshot = handle.snapshot().await.unwrap();
    let CheckoutState::Completed { confirmation } = snapshot.checkout else {
        panic!("expected completed checkout");
    };
    assert_eq!(confirmation.attempt, attempt);
    assert!(snapshot.cart_lines.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pay_in_place_without_runtime() {
    let mut app = signed_in();
    app.dispatch(Intent::AddItem(ProductId::new(10))).unwrap();
    app.dispatch(Intent::Navigate(View::Checkout)).unwrap();

    let confirmation = app.pay().await.unwrap().unwrap();
    assert_eq!(confirmation.total, Price::from_cents(14900));
    assert!(app.cart().is_empty());
    assert_eq!(app.checkout_state().status(), CheckoutStatus::Completed);
}
