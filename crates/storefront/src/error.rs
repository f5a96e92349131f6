//! Unified error handling with Sentry integration.
//!
//! Provides the `AppError` type returned by storefront operations that can
//! fail, plus helpers that enrich Sentry reports with the trail of user
//! actions (breadcrumbs) and the signed-in user.

use thiserror::Error;

use shopfront_core::ProductId;

use crate::catalog::CatalogError;
use crate::reviews::ReviewError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Review was rejected.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Product is not on the wishlist.
    #[error("Not in wishlist: {0}")]
    NotInWishlist(ProductId),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a fault worth reporting, as opposed to a
    /// user mistake.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }

    /// Log the error, capturing internal faults to Sentry.
    ///
    /// User mistakes are logged at `info`, which the Sentry tracing layer
    /// keeps as a breadcrumb rather than an event.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Storefront error");
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after login to associate errors with the shopper.
pub fn set_sentry_user(user_id: &impl ToString, username: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the shopper.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust
/// use shopfront_storefront::error::add_breadcrumb;
///
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "p1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
