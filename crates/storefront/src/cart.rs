//! Shopping cart store.
//!
//! The cart is an ordered list of [`CartEntry`] values with at most one entry
//! per product. Adding a product that is already present bumps its quantity
//! instead of creating a second line. Totals are derived on every read and
//! never cached.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use shopfront_core::{Price, Product, ProductId};

use crate::error::add_breadcrumb;
use crate::notifications::NotificationSink;
use crate::persistence::{ChangeHook, ListPersistence};

/// Blob key holding the persisted cart.
pub const CART_KEY: &str = "cart";

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// Price of this line (`unit price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}

/// In-memory cart with change notification.
pub struct CartStore {
    entries: Vec<CartEntry>,
    hook: Box<dyn ChangeHook<CartEntry>>,
    notifications: NotificationSink,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty cart reporting changes to `hook`.
    #[must_use]
    pub fn new(hook: impl ChangeHook<CartEntry> + 'static, notifications: NotificationSink) -> Self {
        Self {
            entries: Vec::new(),
            hook: Box::new(hook),
            notifications,
        }
    }

    /// Restore the cart from `persistence` and keep saving to it.
    ///
    /// An unreadable blob yields an empty cart. Duplicate lines in the stored
    /// list are merged and empty lines dropped.
    #[must_use]
    pub fn load(persistence: ListPersistence<CartEntry>, notifications: NotificationSink) -> Self {
        let entries = normalize(persistence.load_or_default());
        info!(lines = entries.len(), "Cart restored");
        Self {
            entries,
            hook: Box::new(persistence),
            notifications,
        }
    }

    fn changed(&self) {
        self.hook.on_change(&self.entries);
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|e| &e.product.id == product_id)
    }

    /// Add one unit of `product`.
    ///
    /// New products are appended; products already in the cart keep their
    /// position and gain one unit.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            debug!(quantity = entry.quantity, "Incremented cart line");
            self.notifications
                .info(format!("Updated {} quantity in cart", product.name));
        } else {
            self.entries.push(CartEntry {
                product: product.clone(),
                quantity: 1,
            });
            debug!("Added cart line");
            self.notifications
                .success(format!("Added {} to cart", product.name));
        }

        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));
        self.changed();
    }

    /// Remove the line for `product_id`. Absent products are ignored.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        let Some(index) = self.position(product_id) else {
            return;
        };

        let entry = self.entries.remove(index);
        self.notifications
            .info(format!("Removed {} from cart", entry.product.name));
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", product_id.as_str())]));
        self.changed();
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or less removes the line, exactly like
    /// [`remove_from_cart`](Self::remove_from_cart). Absent products are
    /// ignored.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(product_id);
            return;
        }

        let Some(entry) = self.entries.iter_mut().find(|e| &e.product.id == product_id) else {
            return;
        };
        entry.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        debug!(quantity = entry.quantity, "Updated cart line quantity");
        self.changed();
    }

    /// Empty the cart without per-line notifications.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.entries.clear();
        add_breadcrumb("cart", "Cleared cart", None);
        self.changed();
    }

    /// Cart lines in display order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

/// Restore the one-line-per-product invariant on externally sourced data.
fn normalize(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.quantity == 0 {
            continue;
        }
        match merged.iter_mut().find(|e| e.product.id == entry.product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(entry.quantity),
            None => merged.push(entry),
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use shopfront_core::Rating;

    use super::*;
    use crate::blob::{BlobStore, MemoryBlobStore};
    use crate::notifications::Severity;
    use crate::persistence::NoPersistence;

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_whole(price),
            image: format!("https://img.example/{id}.jpg"),
            description: String::new(),
            category: "Electronics".to_string(),
            rating: Rating::new(4.0).unwrap(),
            in_stock: true,
        }
    }

    fn cart() -> (CartStore, NotificationSink) {
        let sink = NotificationSink::default();
        (CartStore::new(NoPersistence, sink.clone()), sink)
    }

    #[test]
    fn test_adding_same_product_twice_merges() {
        let (mut cart, _) = cart();
        let p1 = product("p1", 999);

        cart.add_to_cart(&p1);
        cart.add_to_cart(&p1);

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 2);
    }

    #[test]
    fn test_add_notifications() {
        let (mut cart, sink) = cart();
        let p1 = product("p1", 10);

        cart.add_to_cart(&p1);
        cart.add_to_cart(&p1);

        let shown = sink.active();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].severity, Severity::Success);
        assert_eq!(shown[0].message, "Added Product p1 to cart");
        assert_eq!(shown[1].severity, Severity::Info);
        assert_eq!(shown[1].message, "Updated Product p1 quantity in cart");
    }

    #[test]
    fn test_new_lines_append_and_existing_keep_position() {
        let (mut cart, _) = cart();
        cart.add_to_cart(&product("a", 1));
        cart.add_to_cart(&product("b", 1));
        cart.add_to_cart(&product("a", 1));

        let ids: Vec<_> = cart.entries().iter().map(|e| e.product.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -5] {
            let (mut cart, sink) = cart();
            cart.add_to_cart(&product("p1", 10));
            cart.update_quantity(&ProductId::new("p1"), quantity);

            assert!(cart.is_empty());
            let last = sink.active().pop().unwrap();
            assert_eq!(last.message, "Removed Product p1 from cart");
        }
    }

    #[test]
    fn test_update_quantity_sets_without_notification() {
        let (mut cart, sink) = cart();
        cart.add_to_cart(&product("p1", 10));
        let before = sink.active().len();

        cart.update_quantity(&ProductId::new("p1"), 7);

        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 7);
        assert_eq!(sink.active().len(), before);
    }

    #[test]
    fn test_absent_product_operations_are_silent_no_ops() {
        let (mut cart, sink) = cart();
        cart.remove_from_cart(&ProductId::new("ghost"));
        cart.update_quantity(&ProductId::new("ghost"), 3);
        cart.update_quantity(&ProductId::new("ghost"), 0);

        assert!(cart.is_empty());
        assert!(sink.active().is_empty());
    }

    #[test]
    fn test_scenario_totals() {
        let (mut cart, _) = cart();
        let p1 = product("p1", 999);

        cart.add_to_cart(&p1);
        assert_eq!(cart.total(), Price::from_whole(999));
        assert_eq!(cart.item_count(), 1);

        cart.add_to_cart(&p1);
        assert_eq!(cart.total(), Price::from_whole(1998));
        assert_eq!(cart.item_count(), 2);

        cart.update_quantity(&ProductId::new("p1"), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_item_count_after_mixed_operations() {
        let (mut cart, _) = cart();
        let a = product("a", 5);
        let b = product("b", 7);

        cart.add_to_cart(&a);
        cart.add_to_cart(&a);
        cart.add_to_cart(&b);
        cart.remove_from_cart(&b.id);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total(), Price::from_whole(10));
    }

    #[test]
    fn test_total_uses_exact_decimals() {
        let (mut cart, _) = cart();
        let mut cheap = product("c", 0);
        cheap.price = Price::new(Decimal::new(10, 2)).unwrap();

        cart.add_to_cart(&cheap);
        cart.update_quantity(&cheap.id, 3);

        assert_eq!(cart.total().amount(), Decimal::new(30, 2));
    }

    #[test]
    fn test_clear_cart_has_no_notification() {
        let (mut cart, sink) = cart();
        cart.add_to_cart(&product("a", 1));
        cart.add_to_cart(&product("b", 1));
        let before = sink.active().len();

        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(sink.active().len(), before);
    }

    #[test]
    fn test_every_mutation_is_persisted_and_round_trips() {
        let store = Arc::new(MemoryBlobStore::new());
        let sink = NotificationSink::default();
        let mut cart = CartStore::load(ListPersistence::new(store.clone(), CART_KEY), sink.clone());

        cart.add_to_cart(&product("a", 3));
        cart.add_to_cart(&product("b", 4));
        cart.update_quantity(&ProductId::new("b"), 5);

        let reloaded = CartStore::load(ListPersistence::new(store.clone(), CART_KEY), sink);
        assert_eq!(reloaded.entries(), cart.entries());
        assert_eq!(reloaded.total(), Price::from_whole(23));

        cart.clear_cart();
        assert_eq!(store.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_malformed_blob_loads_empty_cart() {
        let store = Arc::new(MemoryBlobStore::with_entries([(CART_KEY, "not json")]));
        let cart = CartStore::load(ListPersistence::new(store, CART_KEY), NotificationSink::default());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_load_merges_duplicate_lines() {
        let a = product("a", 2);
        let stored = vec![
            CartEntry { product: a.clone(), quantity: 1 },
            CartEntry { product: product("b", 1), quantity: 0 },
            CartEntry { product: a, quantity: 2 },
        ];
        let store = Arc::new(MemoryBlobStore::with_entries([(
            CART_KEY,
            serde_json::to_string(&stored).unwrap(),
        )]));

        let cart = CartStore::load(ListPersistence::new(store, CART_KEY), NotificationSink::default());
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries()[0].quantity, 3);
    }
}
