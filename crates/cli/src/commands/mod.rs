//! Subcommand implementations.
//!
//! Each module renders one area of the storefront. Commands write plain text
//! to stdout; logs go to stderr.

pub mod account;
pub mod cart;
pub mod products;
pub mod wishlist;

use shopfront_core::Product;
use shopfront_storefront::Storefront;

/// Print and discard every notification raised during this run.
#[allow(clippy::print_stdout)]
pub fn print_notifications(shop: &Storefront) {
    for notification in shop.notifications().drain() {
        println!("[{}] {}", notification.severity, notification.message);
    }
}

/// One-line product summary used by the list views.
fn product_line(product: &Product) -> String {
    let stock = if product.in_stock { "" } else { "  (out of stock)" };
    format!(
        "{:>4}  {:<32} {:>14}  {} {}{stock}",
        product.id.as_str(),
        product.name,
        product.price.display(),
        stars(product.rating.full_stars()),
        product.rating,
    )
}

/// Five-star bar with `lit` stars filled.
fn stars(lit: u8) -> String {
    let lit = usize::from(lit.min(5));
    format!("{}{}", "★".repeat(lit), "☆".repeat(5 - lit))
}
