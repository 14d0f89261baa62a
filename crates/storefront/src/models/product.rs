//! Catalog product record.

use serde::{Deserialize, Serialize};

use yrush_core::{Price, ProductId};

/// A product on the stationery shelf. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog id, e.g. `DRAW-SHEET-001`.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price (per item, or per page for Xerox services).
    pub price: Price,
    /// Shelf category, e.g. "Drawing".
    pub category: String,
    /// Product type within the category, e.g. "Sketch Book".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Short description.
    #[serde(default)]
    pub details: String,
    /// Image reference (relative path or URL).
    #[serde(default)]
    pub image: String,
}
