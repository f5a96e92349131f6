//! Application state shared by the view layer.
//!
//! A single [`Storefront`] is built at startup and handed by reference to
//! whatever renders it. It owns every store; nothing is looked up ambiently.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument};

use shopfront_core::{Price, Product, ProductId};

use crate::auth::MockAuth;
use crate::blob::{BlobStore, DirBlobStore};
use crate::cart::{CART_KEY, CartStore};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::notifications::NotificationSink;
use crate::persistence::ListPersistence;
use crate::reviews::{Review, ReviewBoard};
use crate::theme::Theme;
use crate::wishlist::{WISHLIST_KEY, WishlistStore};

/// Cart totals as shown on the checkout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Price,
    /// Shipping is always free.
    pub shipping: Price,
    pub total: Price,
    pub item_count: u64,
    pub line_count: usize,
}

/// Every piece of client state, constructed once per process.
pub struct Storefront {
    catalog: Catalog,
    notifications: NotificationSink,
    cart: CartStore,
    wishlist: WishlistStore,
    auth: MockAuth,
    theme: Theme,
    reviews: ReviewBoard,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("products", &self.catalog.len())
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("auth", &self.auth)
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Build the storefront from configuration, persisting under
    /// `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured catalog file cannot be loaded.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::builtin()?,
        };
        let store: Arc<dyn BlobStore> = Arc::new(DirBlobStore::new(config.data_dir.clone()));
        info!(data_dir = %config.data_dir.display(), "Using directory blob store");

        Ok(Self::new(
            catalog,
            store,
            config.notification_duration,
            config.theme,
        ))
    }

    /// Build the storefront from explicit parts, restoring any state found
    /// in `store`.
    #[must_use]
    pub fn new(
        catalog: Catalog,
        store: Arc<dyn BlobStore>,
        notification_duration: Duration,
        theme: Theme,
    ) -> Self {
        let notifications = NotificationSink::new(notification_duration);
        let cart = CartStore::load(
            ListPersistence::new(Arc::clone(&store), CART_KEY),
            notifications.clone(),
        );
        let wishlist = WishlistStore::load(
            ListPersistence::new(Arc::clone(&store), WISHLIST_KEY),
            notifications.clone(),
        );
        let auth = MockAuth::load(store);

        Self {
            catalog,
            notifications,
            cart,
            wishlist,
            auth,
            theme,
            reviews: ReviewBoard::new(),
        }
    }

    /// Product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Notification queue shared by all stores.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationSink {
        &self.notifications
    }

    /// Cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Mutable cart store.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Wishlist store.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// Mutable wishlist store.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    /// Authentication state.
    #[must_use]
    pub const fn auth(&self) -> &MockAuth {
        &self.auth
    }

    /// Mutable authentication state.
    pub const fn auth_mut(&mut self) -> &mut MockAuth {
        &mut self.auth
    }

    /// Current theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip between light and dark; returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle();
        self.theme
    }

    /// Review board.
    #[must_use]
    pub const fn reviews(&self) -> &ReviewBoard {
        &self.reviews
    }

    /// Look up a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for unknown ids.
    pub fn product(&self, id: &ProductId) -> Result<&Product> {
        self.catalog
            .get(id)
            .ok_or_else(|| AppError::ProductNotFound(id.clone()))
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for unknown ids.
    pub fn add_to_cart_by_id(&mut self, id: &ProductId) -> Result<()> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::ProductNotFound(id.clone()))?;
        self.cart.add_to_cart(product);
        Ok(())
    }

    /// Save a catalog product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for unknown ids.
    pub fn add_to_wishlist_by_id(&mut self, id: &ProductId) -> Result<()> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::ProductNotFound(id.clone()))?;
        self.wishlist.add_to_wishlist(product);
        Ok(())
    }

    /// Toggle a catalog product on the wishlist; returns whether it is saved
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for unknown ids.
    pub fn toggle_wishlist_by_id(&mut self, id: &ProductId) -> Result<bool> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::ProductNotFound(id.clone()))?;
        Ok(self.wishlist.toggle(product))
    }

    /// Move a saved product into the cart: one unit is added to the cart and
    /// the wishlist entry is removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotInWishlist` if the product is not saved.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn move_to_cart(&mut self, id: &ProductId) -> Result<()> {
        let product = self
            .wishlist
            .get(id)
            .map(|entry| entry.product.clone())
            .ok_or_else(|| AppError::NotInWishlist(id.clone()))?;

        self.cart.add_to_cart(&product);
        self.wishlist.remove_from_wishlist(id);
        Ok(())
    }

    /// Post a review as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ProductNotFound` for unknown ids and
    /// `AppError::Review` if the review is rejected.
    pub fn add_review(&mut self, id: &ProductId, rating: u8, comment: &str) -> Result<Review> {
        if self.catalog.get(id).is_none() {
            return Err(AppError::ProductNotFound(id.clone()));
        }
        let review = self
            .reviews
            .add_review(id, self.auth.current_user(), rating, comment)?;
        Ok(review)
    }

    /// Totals for the checkout summary.
    #[must_use]
    pub fn order_summary(&self) -> OrderSummary {
        let subtotal = self.cart.total();
        let shipping = Price::ZERO;
        OrderSummary {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: self.cart.item_count(),
            line_count: self.cart.entries().len(),
        }
    }
}
