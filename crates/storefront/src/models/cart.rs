//! Cart contents and priced cart views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use yrush_core::{Price, ProductId};

/// Product id to quantity. A missing id means "not in cart".
///
/// Every stored quantity is at least 1: [`Cart::add`] floors at 1 and
/// [`Cart::set`] removes the entry for anything below 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(BTreeMap<ProductId, u32>);

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity held for `id`, if any.
    #[must_use]
    pub fn quantity(&self, id: &ProductId) -> Option<u32> {
        self.0.get(id).copied()
    }

    /// Add `delta` to the quantity for `id` and return the new quantity.
    ///
    /// The result never drops below 1, even for a negative `delta`.
    pub fn add(&mut self, id: ProductId, delta: i64) -> u32 {
        let current = i64::from(self.quantity(&id).unwrap_or(0));
        let next = clamp_quantity(current.saturating_add(delta).max(1));
        self.0.insert(id, next);
        next
    }

    /// Set the quantity for `id`. Anything below 1 removes the entry.
    ///
    /// Returns the stored quantity, or `None` if the entry was removed.
    pub fn set(&mut self, id: ProductId, quantity: i64) -> Option<u32> {
        if quantity <= 0 {
            self.0.remove(&id);
            return None;
        }
        let quantity = clamp_quantity(quantity);
        self.0.insert(id, quantity);
        Some(quantity)
    }

    /// Drop entries that break the positive-quantity invariant.
    ///
    /// Storage written by something other than this type may hold zeros.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.0.retain(|_, qty| *qty > 0);
        self
    }

    /// Iterate entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.0.iter().map(|(id, qty)| (id, *qty))
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn clamp_quantity(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// A cart entry resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product id.
    pub id: ProductId,
    /// Product name at pricing time.
    pub name: String,
    /// Unit price at pricing time.
    pub unit_price: Price,
    /// Quantity (at least 1).
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub line_total: Price,
}

/// Priced view of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartTotals {
    /// Lines whose product exists in the catalog.
    pub lines: Vec<LineItem>,
    /// Sum of line totals.
    pub subtotal: Price,
    /// Equal to the subtotal; there is no tax or discount.
    pub total: Price,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartTotals {
    /// Build totals from priced lines.
    #[must_use]
    pub fn from_lines(lines: Vec<LineItem>) -> Self {
        let subtotal: Price = lines.iter().map(|l| l.line_total).sum();
        let item_count = lines.iter().map(|l| u64::from(l.quantity)).sum();
        Self {
            lines,
            subtotal,
            total: subtotal,
            item_count,
        }
    }
}
