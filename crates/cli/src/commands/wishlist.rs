//! Wishlist commands.

use shopfront_core::ProductId;
use shopfront_storefront::{Result, Storefront};

use super::product_line;

/// Print saved products, oldest first.
#[allow(clippy::print_stdout)]
pub fn show(shop: &Storefront) {
    let wishlist = shop.wishlist();
    if wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return;
    }
    for entry in wishlist.entries() {
        println!(
            "{}  saved {}",
            product_line(&entry.product),
            entry.added_at.format("%Y-%m-%d")
        );
    }
    println!();
    println!("{} saved", wishlist.len());
}

/// Save a product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub fn add(shop: &mut Storefront, id: &ProductId) -> Result<()> {
    shop.add_to_wishlist_by_id(id)
}

/// Remove a saved product. Unknown ids are ignored.
pub fn remove(shop: &mut Storefront, id: &ProductId) {
    shop.wishlist_mut().remove_from_wishlist(id);
}

/// Save or unsave a product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub fn toggle(shop: &mut Storefront, id: &ProductId) -> Result<()> {
    shop.toggle_wishlist_by_id(id).map(|_| ())
}

/// Move a saved product into the cart.
///
/// # Errors
///
/// Returns an error if the product is not on the wishlist.
pub fn move_to_cart(shop: &mut Storefront, id: &ProductId) -> Result<()> {
    shop.move_to_cart(id)
}

/// Remove every saved product.
pub fn clear(shop: &mut Storefront) {
    shop.wishlist_mut().clear_wishlist();
}
