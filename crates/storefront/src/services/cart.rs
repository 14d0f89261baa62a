//! Cart service.
//!
//! The cart lives in the durable scope under [`keys::CART`] and is priced
//! against the catalog on every read, so a product dropped from the catalog
//! simply disappears from totals.

use yrush_core::ProductId;

use crate::catalog::Catalog;
use crate::models::{Cart, CartTotals, LineItem};
use crate::storage::{JsonStore, keys};

/// Cart manager over the durable store.
pub struct CartService<'a> {
    store: &'a JsonStore,
    catalog: &'a Catalog,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a JsonStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// The stored cart, or an empty one.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.store
            .read(keys::CART, Cart::new())
            .into_value()
            .normalized()
    }

    /// Add `qty` of `id` and return the new quantity.
    ///
    /// A `qty` of 0 adds one. The result is floored at 1, so a negative
    /// `qty` can shrink an entry but never remove it.
    pub fn add_to_cart(&self, id: &ProductId, qty: i64) -> u32 {
        let delta = if qty == 0 { 1 } else { qty };
        let mut cart = self.cart();
        let quantity = cart.add(id.clone(), delta);
        self.store.write(keys::CART, &cart);
        tracing::debug!(product_id = %id, quantity, "Cart updated");
        quantity
    }

    /// Set the quantity for `id`. Zero or below removes it.
    pub fn set_quantity(&self, id: &ProductId, qty: i64) -> Option<u32> {
        let mut cart = self.cart();
        let quantity = cart.set(id.clone(), qty);
        self.store.write(keys::CART, &cart);
        tracing::debug!(product_id = %id, ?quantity, "Cart quantity set");
        quantity
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.store.write(keys::CART, &Cart::new());
    }

    /// Resolve cart entries against the catalog.
    ///
    /// Ids missing from the catalog are skipped.
    #[must_use]
    pub fn line_items(&self, cart: &Cart) -> Vec<LineItem> {
        cart.iter()
            .filter_map(|(id, quantity)| {
                let Some(product) = self.catalog.find(id) else {
                    tracing::debug!(product_id = %id, "Dropping cart entry not in catalog");
                    return None;
                };
                Some(LineItem {
                    id: id.clone(),
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity,
                    line_total: product.price.times(quantity),
                })
            })
            .collect()
    }

    /// Priced view of the stored cart.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_lines(self.line_items(&self.cart()))
    }
}
