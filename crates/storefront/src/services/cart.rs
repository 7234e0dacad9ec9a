//! Cart engine.
//!
//! An ordered list of lines, one per product, in first-added order. Prices
//! and display data are snapshotted when a product is first added, so later
//! catalog changes never reprice an existing line.
//!
//! The engine itself does not know about sessions; the controller only
//! reaches it after the auth guard has passed.

use serde::Serialize;

use eshop_pro_core::{Price, Product, ProductId};

/// A single product's accumulated quantity within the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
    /// Unit price at the moment the line was created.
    pub price_snapshot: Price,
    pub name: String,
    pub category: String,
    pub image_url: String,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            quantity: 1,
            price_snapshot: product.price,
            name: product.name.clone(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
        }
    }

    /// `price_snapshot * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price_snapshot * self.quantity
    }
}

/// Derived cart figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Price,
    pub item_count: u64,
}

/// The cart of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Add one unit of `product`.
    ///
    /// Increments an existing line in place or appends a new line with
    /// quantity 1. Returns the resulting quantity.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }

        self.lines.push(CartLine::from_product(product));
        1
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero or less removes the line. Setting a quantity for a
    /// product that is not in the cart does nothing. Returns whether the cart
    /// changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    /// Subtotal and number of units.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            subtotal: self.lines.iter().map(CartLine::line_total).sum(),
            item_count: self.lines.iter().map(|line| u64::from(line.quantity)).sum(),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
