//! Catalog listing.

use tracing::info;

use yrush_storefront::Storefront;

/// Print products, optionally limited to one category.
pub fn list(shop: &Storefront, category: Option<&str>) {
    let catalog = shop.catalog();
    let products: Vec<_> = match category {
        Some(name) => catalog.in_category(name).collect(),
        None => catalog.iter().collect(),
    };

    if products.is_empty() {
        info!(
            "No products found. Categories: {}",
            catalog.categories().join(", ")
        );
        return;
    }

    for product in products {
        info!(
            "{:<16} {:<28} {:>10}  [{}] {}",
            product.id,
            product.name,
            product.price.display(),
            product.category,
            product.details
        );
    }
}
