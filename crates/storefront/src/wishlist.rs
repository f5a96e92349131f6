//! Wishlist store.
//!
//! Same shape as the cart, minus quantities: each product appears at most
//! once, stamped with when it was saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use shopfront_core::{Product, ProductId};

use crate::error::add_breadcrumb;
use crate::notifications::NotificationSink;
use crate::persistence::{ChangeHook, ListPersistence};

/// Blob key holding the persisted wishlist.
pub const WISHLIST_KEY: &str = "wishlist";

/// One saved product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// In-memory wishlist with change notification.
pub struct WishlistStore {
    entries: Vec<WishlistEntry>,
    hook: Box<dyn ChangeHook<WishlistEntry>>,
    notifications: NotificationSink,
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl WishlistStore {
    /// Create an empty wishlist reporting changes to `hook`.
    #[must_use]
    pub fn new(
        hook: impl ChangeHook<WishlistEntry> + 'static,
        notifications: NotificationSink,
    ) -> Self {
        Self {
            entries: Vec::new(),
            hook: Box::new(hook),
            notifications,
        }
    }

    /// Restore the wishlist from `persistence` and keep saving to it.
    ///
    /// A malformed blob yields an empty wishlist rather than an error.
    #[must_use]
    pub fn load(
        persistence: ListPersistence<WishlistEntry>,
        notifications: NotificationSink,
    ) -> Self {
        let mut entries = persistence.load_or_default();
        dedup_by_product(&mut entries);
        info!(items = entries.len(), "Wishlist restored");
        Self {
            entries,
            hook: Box::new(persistence),
            notifications,
        }
    }

    fn changed(&self) {
        self.hook.on_change(&self.entries);
    }

    /// Save `product`, stamped with the current time. Saving a product that
    /// is already on the list does nothing.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_wishlist(&mut self, product: &Product) {
        self.add_at(product, Utc::now());
    }

    fn add_at(&mut self, product: &Product, added_at: DateTime<Utc>) {
        if self.is_in_wishlist(&product.id) {
            return;
        }

        self.entries.push(WishlistEntry {
            product: product.clone(),
            added_at,
        });
        self.notifications
            .success(format!("Added {} to wishlist", product.name));
        add_breadcrumb(
            "wishlist",
            "Added to wishlist",
            Some(&[("product_id", product.id.as_str())]),
        );
        self.changed();
    }

    /// Drop `product_id` from the list. Absent products are ignored.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_from_wishlist(&mut self, product_id: &ProductId) {
        let Some(index) = self.entries.iter().position(|e| &e.product.id == product_id) else {
            return;
        };

        let entry = self.entries.remove(index);
        self.notifications
            .info(format!("Removed {} from wishlist", entry.product.name));
        add_breadcrumb(
            "wishlist",
            "Removed from wishlist",
            Some(&[("product_id", product_id.as_str())]),
        );
        self.changed();
    }

    /// Remove `product` if saved, save it otherwise. Returns whether the
    /// product is on the list afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.is_in_wishlist(&product.id) {
            self.remove_from_wishlist(&product.id);
            false
        } else {
            self.add_to_wishlist(product);
            true
        }
    }

    /// Whether `product_id` is saved.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| &e.product.id == product_id)
    }

    /// Empty the list without per-item notifications.
    #[instrument(skip(self))]
    pub fn clear_wishlist(&mut self) {
        self.entries.clear();
        add_breadcrumb("wishlist", "Cleared wishlist", None);
        self.changed();
    }

    /// Saved products, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Entry for `product_id`, if saved.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&WishlistEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keep the first entry per product.
fn dedup_by_product(entries: &mut Vec<WishlistEntry>) {
    let mut seen: Vec<ProductId> = Vec::with_capacity(entries.len());
    entries.retain(|e| {
        if seen.contains(&e.product.id) {
            false
        } else {
            seen.push(e.product.id.clone());
            true
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use shopfront_core::{Price, Rating};

    use super::*;
    use crate::blob::{BlobStore, MemoryBlobStore};
    use crate::notifications::Severity;
    use crate::persistence::NoPersistence;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::from_whole(100),
            image: String::new(),
            description: String::new(),
            category: "Home".to_string(),
            rating: Rating::new(3.5).unwrap(),
            in_stock: true,
        }
    }

    fn wishlist() -> (WishlistStore, NotificationSink) {
        let sink = NotificationSink::default();
        (WishlistStore::new(NoPersistence, sink.clone()), sink)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (mut wishlist, sink) = wishlist();
        let p = product("p1");

        wishlist.add_to_wishlist(&p);
        wishlist.add_to_wishlist(&p);

        assert_eq!(wishlist.len(), 1);
        let shown = sink.active();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].severity, Severity::Success);
        assert_eq!(shown[0].message, "Added Item p1 to wishlist");
    }

    #[test]
    fn test_remove_notifies_only_when_present() {
        let (mut wishlist, sink) = wishlist();
        wishlist.remove_from_wishlist(&ProductId::new("p1"));
        assert!(sink.active().is_empty());

        wishlist.add_to_wishlist(&product("p1"));
        wishlist.remove_from_wishlist(&ProductId::new("p1"));

        assert!(wishlist.is_empty());
        let last = sink.active().pop().unwrap();
        assert_eq!(last.severity, Severity::Info);
        assert_eq!(last.message, "Removed Item p1 from wishlist");
    }

    #[test]
    fn test_membership_and_toggle() {
        let (mut wishlist, _) = wishlist();
        let p = product("p1");
        assert!(!wishlist.is_in_wishlist(&p.id));

        assert!(wishlist.toggle(&p));
        assert!(wishlist.is_in_wishlist(&p.id));

        assert!(!wishlist.toggle(&p));
        assert!(!wishlist.is_in_wishlist(&p.id));
    }

    #[test]
    fn test_clear_is_silent() {
        let (mut wishlist, sink) = wishlist();
        wishlist.add_to_wishlist(&product("a"));
        wishlist.add_to_wishlist(&product("b"));
        let before = sink.active().len();

        wishlist.clear_wishlist();

        assert!(wishlist.is_empty());
        assert_eq!(sink.active().len(), before);
    }

    #[test]
    fn test_round_trip_preserves_timestamps() {
        let store = Arc::new(MemoryBlobStore::new());
        let sink = NotificationSink::default();
        let mut wishlist =
            WishlistStore::load(ListPersistence::new(store.clone(), WISHLIST_KEY), sink.clone());

        let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        wishlist.add_at(&product("a"), stamp);
        wishlist.add_to_wishlist(&product("b"));

        let raw = store.get(WISHLIST_KEY).unwrap().unwrap();
        assert!(raw.contains("\"addedAt\":\"2024-03-01T12:30:00Z\""));

        let reloaded = WishlistStore::load(ListPersistence::new(store, WISHLIST_KEY), sink);
        assert_eq!(reloaded.entries(), wishlist.entries());
        assert_eq!(reloaded.get(&ProductId::new("a")).unwrap().added_at, stamp);
    }

    #[test]
    fn test_malformed_blob_initializes_empty() {
        let store = Arc::new(MemoryBlobStore::with_entries([(WISHLIST_KEY, "[{\"product\":")]));
        let wishlist =
            WishlistStore::load(ListPersistence::new(store, WISHLIST_KEY), NotificationSink::default());
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_products() {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let stored = vec![
            WishlistEntry { product: product("a"), added_at: stamp },
            WishlistEntry { product: product("a"), added_at: Utc::now() },
        ];
        let store = Arc::new(MemoryBlobStore::with_entries([(
            WISHLIST_KEY,
            serde_json::to_string(&stored).unwrap(),
        )]));

        let wishlist =
            WishlistStore::load(ListPersistence::new(store, WISHLIST_KEY), NotificationSink::default());
        assert_eq!(wishlist.len(), 1);
        assert_eq!(wishlist.entries()[0].added_at, stamp);
    }
}
