//! Read-only product catalog.
//!
//! The catalog is loaded once at startup, either from the bundled demo data
//! or from a JSON file, and is never mutated afterwards.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use shopfront_core::{Price, Product, ProductId};

const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// Immutable list of products, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The bundled demo catalog.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled data is corrupt.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PRODUCTS)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// The first `n` products, shown on the home page.
    #[must_use]
    pub fn featured(&self, n: usize) -> &[Product] {
        self.products.get(..n.min(self.products.len())).unwrap_or_default()
    }

    /// Distinct category labels in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Products matching `query`, in catalog order.
    #[must_use]
    pub fn search(&self, query: &ProductQuery) -> Vec<&Product> {
        self.products.iter().filter(|p| query.matches(p)).collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Filter for [`Catalog::search`].
///
/// The price bounds never cross: a minimum above the current maximum (or a
/// maximum below the current minimum) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    term: Option<String>,
    category: Option<String>,
    min_price: Option<Price>,
    max_price: Option<Price>,
    in_stock_only: bool,
}

impl ProductQuery {
    /// Query matching every product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive text matched against name, description and category.
    /// A blank term matches everything.
    #[must_use]
    pub fn term(mut self, term: &str) -> Self {
        let term = term.trim();
        self.term = (!term.is_empty()).then(|| term.to_lowercase());
        self
    }

    /// Exact (case-insensitive) category filter.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.trim().to_lowercase());
        self
    }

    /// Inclusive lower price bound.
    #[must_use]
    pub fn min_price(mut self, min: Price) -> Self {
        if self.max_price.is_none_or(|max| min <= max) {
            self.min_price = Some(min);
        }
        self
    }

    /// Inclusive upper price bound.
    #[must_use]
    pub fn max_price(mut self, max: Price) -> Self {
        if self.min_price.is_none_or(|min| max >= min) {
            self.max_price = Some(max);
        }
        self
    }

    /// Only products currently in stock.
    #[must_use]
    pub const fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self
    }

    /// Whether `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.in_stock_only && !product.in_stock {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if self
            .category
            .as_ref()
            .is_some_and(|category| product.category.to_lowercase() != *category)
        {
            return false;
        }
        self.term.as_ref().is_none_or(|term| {
            product.name.to_lowercase().contains(term)
                || product.description.to_lowercase().contains(term)
                || product.category.to_lowercase().contains(term)
        })
    }
}
