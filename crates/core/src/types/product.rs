//! Catalog product.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Rating};

/// An immutable catalog entry.
///
/// The catalog owns products; carts and wishlists keep their own copies so
/// that persisted state renders even if the catalog changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Long-form description.
    pub description: String,
    /// Category label (e.g. "Electronics").
    pub category: String,
    /// Average customer rating.
    pub rating: Rating,
    /// Whether the product can currently be ordered.
    pub in_stock: bool,
}
