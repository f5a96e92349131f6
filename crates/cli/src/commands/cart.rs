//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! sf-cli cart add 3
//! sf-cli cart set 3 2
//! sf-cli cart remove 3
//! sf-cli summary
//! ```

use shopfront_core::ProductId;
use shopfront_storefront::{Result, Storefront};

use super::product_line;

/// Print cart lines with totals.
#[allow(clippy::print_stdout)]
pub fn show(shop: &Storefront) {
    let cart = shop.cart();
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for entry in cart.entries() {
        println!(
            "{}  x{:<3} = {}",
            product_line(&entry.product),
            entry.quantity,
            entry.line_total().display()
        );
    }
    println!();
    println!("Items: {}  Total: {}", cart.item_count(), cart.total().display());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub fn add(shop: &mut Storefront, id: &ProductId) -> Result<()> {
    shop.add_to_cart_by_id(id)
}

/// Remove a line. Unknown ids are ignored.
pub fn remove(shop: &mut Storefront, id: &ProductId) {
    shop.cart_mut().remove_from_cart(id);
}

/// Set a line's quantity; zero or less removes the line.
pub fn set(shop: &mut Storefront, id: &ProductId, quantity: i64) {
    shop.cart_mut().update_quantity(id, quantity);
}

/// Empty the cart.
pub fn clear(shop: &mut Storefront) {
    shop.cart_mut().clear_cart();
}

/// Print the checkout summary.
#[allow(clippy::print_stdout)]
pub fn summary(shop: &Storefront) {
    let summary = shop.order_summary();
    println!("Order summary");
    println!(
        "  Items:    {} ({} lines)",
        summary.item_count, summary.line_count
    );
    println!("  Subtotal: {}", summary.subtotal.display());
    println!("  Shipping: Free");
    println!("  Total:    {}", summary.total.display());
    if let Some(user) = shop.auth().current_user() {
        println!("  Ship to:  {} <{}>", user.username, user.email);
    }
}
