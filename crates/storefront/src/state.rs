//! Application state and the intent-dispatch entry point.
//!
//! [`AppState`] is the single owner of everything the storefront tracks for
//! one client: the session store, the cart, the current view, the open product
//! overlay, the checkout and the catalog filter. The view layer never mutates
//! it directly; it sends an [`Intent`] to [`AppState::dispatch`] and re-renders
//! from [`AppState::snapshot`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use eshop_pro_core::{AttemptId, Product, ProductId, UserId};

use crate::catalog::{ALL_CATEGORIES, Catalog};
use crate::clock::SystemClock;
use crate::config::StorefrontConfig;
use crate::db::{FileStore, KeyValueStore, MemoryStore};
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::models::{Identity, Session};
use crate::routes::{self, View};
use crate::services::auth::{AuthError, SessionStore};
use crate::services::cart::{Cart, CartLine, CartTotals};
use crate::services::checkout::{CheckoutSimulator, CheckoutState, OrderConfirmation, PendingPayment};

/// Something the shopper asked for.
#[derive(Clone, PartialEq, Eq)]
pub enum Intent {
    Signup { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    AddItem(ProductId),
    /// Zero or less removes the line.
    SetQuantity { product_id: ProductId, quantity: i64 },
    RemoveItem(ProductId),
    Navigate(View),
    SelectProduct(ProductId),
    DismissProduct,
    Pay,
    SetCategory(String),
    SetSearch(String),
}

impl Intent {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::AddItem(_) => "add_item",
            Self::SetQuantity { .. } => "set_quantity",
            Self::RemoveItem(_) => "remove_item",
            Self::Navigate(_) => "navigate",
            Self::SelectProduct(_) => "select_product",
            Self::DismissProduct => "dismiss_product",
            Self::Pay => "pay",
            Self::SetCategory(_) => "set_category",
            Self::SetSearch(_) => "set_search",
        }
    }
}

impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signup { email, .. } | Self::Login { email, .. } => f
                .debug_struct(self.name())
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::AddItem(id) | Self::RemoveItem(id) | Self::SelectProduct(id) => {
                f.debug_tuple(self.name()).field(id).finish()
            }
            Self::SetQuantity {
                product_id,
                quantity,
            } => f
                .debug_struct(self.name())
                .field("product_id", product_id)
                .field("quantity", quantity)
                .finish(),
            Self::Navigate(view) => f.debug_tuple(self.name()).field(view).finish(),
            Self::SetCategory(value) | Self::SetSearch(value) => {
                f.debug_tuple(self.name()).field(value).finish()
            }
            Self::Logout | Self::DismissProduct | Self::Pay => f.write_str(self.name()),
        }
    }
}

/// Authentication status as shown to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub is_authenticated: bool,
    pub email: Option<String>,
    /// Part of the email before the `@`, for the header greeting.
    pub display_name: Option<String>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            is_authenticated: session.is_authenticated(),
            email: session.email().map(|email| email.as_str().to_owned()),
            display_name: session.email().map(|email| email.local_part().to_owned()),
        }
    }
}

/// Read-only copy of everything the view layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub session: SessionSnapshot,
    pub cart_lines: Vec<CartLine>,
    pub totals: CartTotals,
    /// The underlying view; the product overlay is reported separately.
    pub current_view: View,
    pub selected_product: Option<Product>,
    pub checkout: CheckoutState,
    pub category: String,
    pub search: String,
    pub visible_products: Vec<Product>,
    pub categories: Vec<String>,
    pub auth_error: Option<String>,
}

/// The storefront state of one client.
pub struct AppState {
    sessions: SessionStore,
    catalog: Catalog,
    cart: Cart,
    view: View,
    selected_product: Option<ProductId>,
    checkout: CheckoutSimulator,
    category: String,
    search: String,
    auth_error: Option<String>,
}

impl AppState {
    /// Create the application state and restore any persisted session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` if the local store cannot be read.
    pub fn new(mut sessions: SessionStore, catalog: Catalog, checkout: CheckoutSimulator) -> Result<Self> {
        let session = sessions.restore_session()?;
        if let Some(identity) = session.identity() {
            set_sentry_user(&identity.user_id, Some(identity.email.as_str()));
        }

        Ok(Self {
            sessions,
            catalog,
            cart: Cart::new(),
            view: View::Home,
            selected_product: None,
            checkout,
            category: ALL_CATEGORIES.to_owned(),
            search: String::new(),
            auth_error: None,
        })
    }

    /// Build the application state described by `config`, on the system clock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if the configured storage file is unusable.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let store: Box<dyn KeyValueStore> = match &config.storage_path {
            Some(path) => Box::new(FileStore::open(path)?),
            None => Box::new(MemoryStore::new()),
        };
        let sessions = SessionStore::new(store, Arc::new(SystemClock), config.auth_settings());

        Self::new(
            sessions,
            Catalog::new(),
            CheckoutSimulator::new(config.checkout_delay),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn session(&self) -> Session {
        self.sessions.session()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The view being shown, with the product overlay taking precedence.
    #[must_use]
    pub fn view(&self) -> View {
        self.selected_product
            .map_or(self.view, View::ProductDetail)
    }

    #[must_use]
    pub const fn checkout_state(&self) -> CheckoutState {
        self.checkout.state()
    }

    #[must_use]
    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Registered accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` if the records cannot be loaded.
    pub fn accounts(&mut self) -> Result<Vec<Identity>> {
        Ok(self.sessions.accounts()?)
    }

    /// Everything the view layer needs to render.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            session: SessionSnapshot::from(&self.session()),
            cart_lines: self.cart.lines().to_vec(),
            totals: self.cart.totals(),
            current_view: self.view,
            selected_product: self
                .selected_product
                .and_then(|id| self.catalog.get(id))
                .cloned(),
            checkout: self.checkout.state(),
            category: self.category.clone(),
            search: self.search.clone(),
            visible_products: self
                .catalog
                .filter(&self.category, &self.search)
                .into_iter()
                .cloned()
                .collect(),
            categories: self.catalog.list_categories().to_vec(),
            auth_error: self.auth_error.clone(),
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Apply one intent.
    ///
    /// Redirects are not errors: an intent the guard rejects changes the view
    /// and returns `Ok`. A payment that was started is returned so the caller
    /// can wait it out and hand it to [`settle_payment`](Self::settle_payment).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` for failed signup/login (also recorded as the
    /// inline auth message), `AppError::UnknownProduct` for ids outside the
    /// catalog, `AppError::Checkout` for a resubmitted payment and
    /// `AppError::Storage` if the local store fails.
    #[instrument(skip(self, intent), fields(intent = intent.name()))]
    pub fn dispatch(&mut self, intent: Intent) -> Result<Option<PendingPayment>> {
        add_breadcrumb("intent", intent.name(), None);
        self.expire_stale_session()?;

        match intent {
            Intent::Signup { email, password } => {
                let previous = self.signed_in_user();
                let result = self.sessions.signup(&email, &password);
                self.finish_sign_in(previous, result)?;
            }
            Intent::Login { email, password } => {
                let previous = self.signed_in_user();
                let result = self.sessions.login(&email, &password);
                self.finish_sign_in(previous, result)?;
            }
            Intent::Logout => self.logout()?,
            Intent::AddItem(product_id) => self.add_item(product_id)?,
            Intent::SetQuantity {
                product_id,
                quantity,
            } => {
                if self.require_auth().is_some() && self.cart.set_quantity(product_id, quantity) {
                    tracing::debug!(%product_id, quantity, "Quantity changed");
                }
            }
            Intent::RemoveItem(product_id) => {
                if self.require_auth().is_some() && self.cart.remove_item(product_id) {
                    tracing::debug!(%product_id, "Line removed");
                }
            }
            Intent::Navigate(View::ProductDetail(product_id)) | Intent::SelectProduct(product_id) => {
                self.select_product(product_id)?;
            }
            Intent::Navigate(target) => self.navigate(target),
            Intent::DismissProduct => self.selected_product = None,
            Intent::Pay => return self.begin_payment(),
            Intent::SetCategory(category) => self.category = category,
            Intent::SetSearch(search) => self.search = search,
        }

        Ok(None)
    }

    /// Apply the outcome of a payment whose delay has elapsed.
    ///
    /// Clears the cart and returns the confirmation if `attempt` is still the
    /// active checkout; a cancelled or superseded attempt changes nothing.
    pub fn settle_payment(&mut self, attempt: AttemptId) -> Option<OrderConfirmation> {
        let confirmation = self.checkout.settle(attempt)?;
        self.cart.clear();
        let total = confirmation.total.to_string();
        add_breadcrumb("checkout", "Payment settled", Some(&[("total", total.as_str())]));
        Some(confirmation)
    }

    /// Submit a payment and wait out the simulated delay in place.
    ///
    /// Returns `None` if the guard redirected instead of starting a payment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` if a payment is already processing.
    pub async fn pay(&mut self) -> Result<Option<OrderConfirmation>> {
        let Some(pending) = self.dispatch(Intent::Pay)? else {
            return Ok(None);
        };
        let attempt = pending.wait().await;
        Ok(self.settle_payment(attempt))
    }

    // =========================================================================
    // Intent Handlers
    // =========================================================================

    fn expire_stale_session(&mut self) -> Result<()> {
        if self.sessions.expire_if_stale()? {
            self.cart.clear();
            self.checkout.reset();
            clear_sentry_user();
            self.view = routes::resolve(self.view, &Session::anonymous(), true);
        }
        Ok(())
    }

    fn signed_in_user(&self) -> Option<UserId> {
        self.sessions.active_claims().map(|claims| claims.user_id.clone())
    }

    /// Land on home after a sign-in, or record the failure for the auth view.
    ///
    /// Switching to a different account drops the previous account's cart.
    fn finish_sign_in(
        &mut self,
        previous: Option<UserId>,
        result: std::result::Result<Identity, AuthError>,
    ) -> Result<()> {
        match result {
            Ok(identity) => {
                if previous.is_some_and(|user_id| user_id != identity.user_id) {
                    self.cart.clear();
                    self.checkout.reset();
                }
                set_sentry_user(&identity.user_id, Some(identity.email.as_str()));
                self.land_on(View::Home);
                Ok(())
            }
            Err(e) => {
                let err = AppError::from(e);
                if !err.is_internal() {
                    tracing::warn!(error = %err, "Authentication failed");
                    self.land_on(View::Auth);
                    self.auth_error = Some(err.user_message());
                }
                Err(err)
            }
        }
    }

    fn logout(&mut self) -> Result<()> {
        self.sessions.logout()?;
        self.cart.clear();
        self.checkout.reset();
        clear_sentry_user();
        self.land_on(View::Home);
        Ok(())
    }

    /// The signed-in identity, or redirect to the auth view.
    fn require_auth(&mut self) -> Option<Identity> {
        match RequireAuth::check(&self.sessions.session()) {
            Ok(RequireAuth(identity)) => Some(identity),
            Err(rejection) => {
                tracing::warn!("Cart mutation while signed out, redirecting");
                self.navigate(rejection.redirect());
                None
            }
        }
    }

    fn add_item(&mut self, product_id: ProductId) -> Result<()> {
        let product = self
            .catalog
            .get(product_id)
            .cloned()
            .ok_or(AppError::UnknownProduct(product_id))?;

        if self.selected_product == Some(product_id) {
            self.selected_product = None;
        }

        if self.require_auth().is_some() {
            let quantity = self.cart.add_item(&product);
            tracing::info!(%product_id, quantity, "Added to cart");
            let product_id = product_id.to_string();
            add_breadcrumb("cart", "Added item", Some(&[("product_id", product_id.as_str())]));
        }
        Ok(())
    }

    fn select_product(&mut self, product_id: ProductId) -> Result<()> {
        if self.catalog.get(product_id).is_none() {
            return Err(AppError::UnknownProduct(product_id));
        }
        // The overlay hides checkout, so a payment in flight is cancelled.
        if self.view == View::Checkout {
            self.checkout.reset();
        }
        self.selected_product = Some(product_id);
        Ok(())
    }

    fn navigate(&mut self, target: View) {
        let resolved = routes::resolve(target, &self.sessions.session(), self.cart.is_empty());
        if resolved != target {
            tracing::info!(%target, %resolved, "Navigation redirected");
        }
        self.land_on(resolved);
    }

    /// Switch to an already resolved view.
    ///
    /// Every view change goes through here: leaving checkout resets it.
    fn land_on(&mut self, view: View) {
        if self.view == View::Checkout && view != View::Checkout {
            self.checkout.reset();
        }
        self.selected_product = None;
        self.auth_error = None;
        self.view = view;
    }

    fn begin_payment(&mut self) -> Result<Option<PendingPayment>> {
        let allowed = routes::resolve(View::Checkout, &self.sessions.session(), self.cart.is_empty());
        if self.view() != View::Checkout || allowed != View::Checkout {
            tracing::warn!(view = %self.view, "Payment submitted outside checkout");
            self.navigate(View::Checkout);
            return Ok(None);
        }

        let pending = self.checkout.begin(self.cart.totals().subtotal)?;
        let attempt = pending.attempt.to_string();
        add_breadcrumb("checkout", "Payment submitted", Some(&[("attempt", attempt.as_str())]));
        Ok(Some(pending))
    }
}
