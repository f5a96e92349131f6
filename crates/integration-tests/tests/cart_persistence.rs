//! Integration tests for the cart store over a directory-backed blob store.
//!
//! Each test gets its own temporary directory, so restarts are simulated by
//! building a second store over the same directory.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::sync::Arc;

use shopfront_core::{Price, ProductId};
use shopfront_integration_tests::{product, product_priced};
use shopfront_storefront::blob::{BlobStore, DirBlobStore};
use shopfront_storefront::cart::{CART_KEY, CartEntry, CartStore};
use shopfront_storefront::notifications::NotificationSink;
use shopfront_storefront::persistence::ListPersistence;

fn open_cart(store: &Arc<DirBlobStore>) -> CartStore {
    let store: Arc<dyn BlobStore> = store.clone();
    CartStore::load(
        ListPersistence::new(store, CART_KEY),
        NotificationSink::default(),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_add_twice_then_zero_quantity_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let mut cart = open_cart(&store);
    let p1 = product("p1", 999);

    cart.add_to_cart(&p1);
    assert_eq!(cart.total(), Price::from_whole(999));
    assert_eq!(cart.item_count(), 1);

    cart.add_to_cart(&p1);
    assert_eq!(cart.entries().len(), 1);
    assert_eq!(cart.total(), Price::from_whole(1998));
    assert_eq!(cart.item_count(), 2);

    cart.update_quantity(&p1.id, 0);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Price::ZERO);

    // The emptied cart is what a restart sees.
    assert!(open_cart(&store).is_empty());
}

#[test]
fn test_item_count_after_add_add_add_remove() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let mut cart = open_cart(&store);
    let a = product("a", 100);
    let b = product("b", 250);

    cart.add_to_cart(&a);
    cart.add_to_cart(&a);
    cart.add_to_cart(&b);
    cart.remove_from_cart(&b.id);

    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total(), Price::from_whole(200));
}

#[test]
fn test_negative_quantity_removes_line() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let mut cart = open_cart(&store);
    let p = product("p", 10);

    cart.add_to_cart(&p);
    cart.update_quantity(&p.id, -5);

    assert!(cart.get(&p.id).is_none());
    assert!(open_cart(&store).is_empty());
}

#[test]
fn test_total_tracks_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let mut cart = open_cart(&store);
    let a = product_priced("a", "12.50");
    let b = product_priced("b", "0.99");

    let expected = |cart: &CartStore| -> Price {
        cart.entries().iter().map(CartEntry::line_total).sum()
    };

    cart.add_to_cart(&a);
    assert_eq!(cart.total(), expected(&cart));
    cart.add_to_cart(&b);
    cart.update_quantity(&b.id, 7);
    assert_eq!(cart.total(), expected(&cart));
    assert_eq!(cart.total().display(), "₹19.43");
    cart.remove_from_cart(&a.id);
    assert_eq!(cart.total(), expected(&cart));
    cart.clear_cart();
    assert_eq!(cart.total(), Price::ZERO);
}

// =============================================================================
// Restore
// =============================================================================

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let a = product_priced("a", "1499.00");
    let b = product("b", 20);

    let before = {
        let mut cart = open_cart(&store);
        cart.add_to_cart(&a);
        cart.add_to_cart(&b);
        cart.update_quantity(&a.id, 3);
        cart.entries().to_vec()
    };

    let restored = open_cart(&store);
    assert_eq!(restored.entries(), before.as_slice());
    assert_eq!(restored.entries()[0].product.id, ProductId::new("a"));
    assert_eq!(restored.entries()[0].quantity, 3);
}

#[test]
fn test_blob_is_written_under_cart_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));
    let mut cart = open_cart(&store);
    cart.add_to_cart(&product("p1", 999));

    let raw = fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["quantity"], 1);
    assert_eq!(json[0]["product"]["id"], "p1");
    assert_eq!(json[0]["product"]["price"], "999");
}

#[test]
fn test_numeric_prices_in_stored_cart_are_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"[{"product":{"id":"p1","name":"Mug","price":999,"image":"","description":"","category":"Home","rating":4.5,"inStock":true},"quantity":2}]"#;
    fs::write(dir.path().join("cart.json"), raw).unwrap();

    let cart = open_cart(&Arc::new(DirBlobStore::new(dir.path())));
    assert_eq!(cart.total(), Price::from_whole(1998));
}

#[test]
fn test_malformed_cart_blob_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "{not json").unwrap();
    let store = Arc::new(DirBlobStore::new(dir.path()));

    let mut cart = open_cart(&store);
    assert!(cart.is_empty());

    // The first mutation replaces the corrupt blob.
    cart.add_to_cart(&product("p1", 5));
    assert_eq!(open_cart(&store).item_count(), 1);
}
