//! Cart commands.
//!
//! Product ids are checked against the catalog here; the cart service itself
//! accepts any id and drops unknown ones when pricing.

use tracing::info;

use yrush_core::ProductId;
use yrush_storefront::{AppError, Storefront};

/// Add `qty` of a product.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an id not in the catalog.
pub fn add(shop: &Storefront, id: &str, qty: i64) -> Result<(), AppError> {
    let id = known_product(shop, id)?;
    let quantity = shop.cart().add_to_cart(&id, qty);
    info!("{id}: {quantity} in cart");
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an id not in the catalog.
pub fn set(shop: &Storefront, id: &str, qty: i64) -> Result<(), AppError> {
    let id = known_product(shop, id)?;
    match shop.cart().set_quantity(&id, qty) {
        Some(quantity) => info!("{id}: {quantity} in cart"),
        None => info!("{id}: removed from cart"),
    }
    Ok(())
}

/// Print the priced cart.
pub fn show(shop: &Storefront) {
    let totals = shop.cart().totals();
    if totals.lines.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for line in &totals.lines {
        info!(
            "{:<16} {:<28} {:>4} x {:>9} = {:>10}",
            line.id,
            line.name,
            line.quantity,
            line.unit_price.display(),
            line.line_total.display()
        );
    }
    info!("{} items, total {}", totals.item_count, totals.total.display());
}

/// Empty the cart.
pub fn clear(shop: &Storefront) {
    shop.cart().clear();
    info!("Cart cleared");
}

fn known_product(shop: &Storefront, id: &str) -> Result<ProductId, AppError> {
    let id = ProductId::new(id.trim());
    if shop.catalog().find(&id).is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    Ok(id)
}
