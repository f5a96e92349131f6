//! Integration tests for the E-Store storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart behavior across restarts on a real directory store
//! - `wishlist_persistence` - wishlist idempotence, restore and malformed blobs
//! - `notification_expiry` - timed auto-dismiss driven by store operations
//! - `storefront_flow` - end-to-end shopping flows, auth and failing storage
//!
//! This crate holds shared fixtures; the tests themselves live in `tests/`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use shopfront_core::{Price, Product, ProductId, Rating};
use shopfront_storefront::Storefront;
use shopfront_storefront::blob::{BlobStore, BlobStoreError, DirBlobStore};
use shopfront_storefront::catalog::Catalog;
use shopfront_storefront::notifications::DEFAULT_DURATION;
use shopfront_storefront::theme::Theme;

/// Build a test product priced in whole rupees.
#[must_use]
pub fn product(id: &str, rupees: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Price::from_whole(rupees),
        image: format!("https://images.example.com/{id}.jpg"),
        description: format!("Description of product {id}"),
        category: "Testing".to_string(),
        rating: Rating::default(),
        in_stock: true,
    }
}

/// Build a test product with a fractional price such as `12.50`.
///
/// # Panics
///
/// Panics if `price` is not a valid non-negative decimal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn product_priced(id: &str, price: &str) -> Product {
    let amount: Decimal = price.parse().unwrap();
    Product {
        price: Price::new(amount).unwrap(),
        ..product(id, 0)
    }
}

/// A storefront persisting into `dir`, using the built-in catalog.
///
/// # Panics
///
/// Panics if the built-in catalog fails to parse.
#[must_use]
pub fn storefront_in(dir: &Path) -> Storefront {
    storefront_with_store(Arc::new(DirBlobStore::new(dir)), DEFAULT_DURATION)
}

/// A storefront over an arbitrary blob store, using the built-in catalog.
///
/// # Panics
///
/// Panics if the built-in catalog fails to parse.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn storefront_with_store(store: Arc<dyn BlobStore>, notifications: Duration) -> Storefront {
    Storefront::new(Catalog::builtin().unwrap(), store, notifications, Theme::Light)
}

/// Blob store whose writes always fail. Reads see an empty store.
#[derive(Debug, Default)]
pub struct ReadOnlyBlobStore;

impl BlobStore for ReadOnlyBlobStore {
    fn get(&self, _key: &str) -> Result<Option<String>, BlobStoreError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), BlobStoreError> {
        Err(BlobStoreError::Rejected {
            key: key.to_owned(),
            reason: "storage quota exceeded".to_string(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), BlobStoreError> {
        Err(BlobStoreError::Rejected {
            key: key.to_owned(),
            reason: "storage is read-only".to_string(),
        })
    }
}
